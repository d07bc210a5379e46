//! Simulation state container and top-level phase machine.
//!
//! A single owned struct shared by both loops, with one writer per field
//! group: snake/food/score/level/speed mutate only inside the tick path,
//! particles only inside the animation path.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_SNAKE_LEN, INITIAL_SPEED_MS};

use super::food::{PlacementError, place_food};
use super::grid::{Cell, Direction};
use super::intent::IntentQueue;
use super::particles::{Particle, ParticleSystem};
use super::snake::Snake;

/// Top-level game mode; gates input acceptance and loop activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before any game has run (attract screen)
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended; only a fresh start leaves this
    Dead,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for food placement and burst jitter
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub snake: Snake,
    /// Current heading, updated only by intent consumption at tick start
    pub direction: Direction,
    pub intents: IntentQueue,
    pub food: Cell,
    pub score: u32,
    pub level: u32,
    /// Logic tick interval in milliseconds
    pub speed_ms: u32,
    /// Best score across games (persisted externally)
    pub best: u32,
    pub particles: ParticleSystem,
}

impl SimState {
    /// Fresh board in Idle: snake in the middle heading right, food
    /// placed, counters reset. Ready for an attract screen.
    pub fn new(seed: u64, best: u32) -> Result<Self, PlacementError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let snake = Snake::spawn(Cell::new(10, 10), Direction::Right, INITIAL_SNAKE_LEN);
        let food = place_food(&mut rng, &snake)?;

        Ok(Self {
            seed,
            rng,
            phase: GamePhase::Idle,
            snake,
            direction: Direction::Right,
            intents: IntentQueue::default(),
            food,
            score: 0,
            level: 1,
            speed_ms: INITIAL_SPEED_MS,
            best,
            particles: ParticleSystem::new(),
        })
    }

    /// Start a game (or restart after death): full reset except `best`.
    pub fn start(&mut self, seed: u64) -> Result<(), PlacementError> {
        *self = Self::new(seed, self.best)?;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Route a normalized direction intent into the pending slot
    pub fn request_direction(&mut self, dir: Direction) -> bool {
        self.intents.request(dir, self.direction, self.phase)
    }

    /// Read-only view for the render surface
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            snake: self.snake.cells().collect(),
            food: self.food,
            particles: self.particles.particles().to_vec(),
            score: self.score,
            level: self.level,
            best: self.best,
        }
    }
}

/// Snapshot handed to the render surface on each redraw request.
/// The core never draws pixels itself.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    /// Body cells, head first
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub level: u32,
    pub best: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{COLS, ROWS};

    #[test]
    fn test_new_state_is_idle() {
        let state = SimState::new(1, 0).unwrap();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.len(), INITIAL_SNAKE_LEN);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed_ms, INITIAL_SPEED_MS);
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_start_resets_but_keeps_best() {
        let mut state = SimState::new(1, 0).unwrap();
        state.start(2).unwrap();
        state.score = 7;
        state.level = 2;
        state.speed_ms = 118;
        state.best = 7;
        state.phase = GamePhase::Dead;

        state.start(3).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed_ms, INITIAL_SPEED_MS);
        assert_eq!(state.snake.len(), INITIAL_SNAKE_LEN);
        assert_eq!(state.best, 7);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = SimState::new(5, 3).unwrap();
        let snap = state.snapshot();
        assert_eq!(snap.snake.len(), state.snake.len());
        assert_eq!(snap.snake[0], state.snake.head());
        assert_eq!(snap.food, state.food);
        assert_eq!(snap.best, 3);
        assert!(snap.snake.iter().all(|c| c.in_bounds()));
        assert!(snap.food.x < COLS && snap.food.y < ROWS);
    }
}
