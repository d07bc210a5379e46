//! Food placement by uniform rejection sampling.

use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::{COLS, FOOD_MAX_ATTEMPTS, ROWS};

use super::grid::Cell;
use super::snake::Snake;

/// Fatal placement failure
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// The grid has no free cell left for food
    #[error("no free cell for food after {attempts} attempts")]
    GridFull { attempts: u32 },
}

/// Pick a uniformly random cell not occupied by the snake.
///
/// Attempts are bounded; running out means the snake occupies
/// (practically) the whole grid and the game cannot continue.
pub fn place_food(rng: &mut Pcg32, snake: &Snake) -> Result<Cell, PlacementError> {
    for _ in 0..FOOD_MAX_ATTEMPTS {
        let cell = Cell::new(rng.random_range(0..COLS), rng.random_range(0..ROWS));
        if !snake.contains(cell) {
            return Ok(cell);
        }
    }
    Err(PlacementError::GridFull {
        attempts: FOOD_MAX_ATTEMPTS,
    })
}
