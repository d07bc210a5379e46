//! Snake body and its per-tick movement state machine.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction};

/// Collision detected while advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    Wall,
    SelfHit,
}

/// What one `advance` call produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The cell the head moved to (or would have moved to, on collision)
    pub new_head: Cell,
    pub collision: Collision,
    /// Head landed on food; tail retained, length grew by one
    pub ate: bool,
}

/// Snake body, head at the front. Mutated only by the tick path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    cells: VecDeque<Cell>,
}

impl Snake {
    /// Spawn a body of `len` cells with the given head, trailing away
    /// from the movement heading.
    pub fn spawn(head: Cell, dir: Direction, len: usize) -> Self {
        let (dx, dy) = dir.delta();
        let cells = (0..len as i32)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Self { cells }
    }

    #[inline]
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Advance the head one cell along `dir`.
    ///
    /// The self-collision test runs against the body *before* the tail is
    /// dropped: the cell the tail is about to vacate still blocks. On a
    /// collision the body is left untouched. Eating `food` keeps the tail,
    /// growing the body by one.
    pub fn advance(&mut self, dir: Direction, food: Cell) -> StepOutcome {
        let new_head = self.head().step(dir);

        if !new_head.in_bounds() {
            return StepOutcome {
                new_head,
                collision: Collision::Wall,
                ate: false,
            };
        }
        if self.contains(new_head) {
            return StepOutcome {
                new_head,
                collision: Collision::SelfHit,
                ate: false,
            };
        }

        self.cells.push_front(new_head);
        let ate = new_head == food;
        if !ate {
            self.cells.pop_back();
        }

        StepOutcome {
            new_head,
            collision: Collision::None,
            ate,
        }
    }
}
