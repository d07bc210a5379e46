//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Advances only through the tick function, one cell per tick
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod food;
pub mod grid;
pub mod intent;
pub mod particles;
pub mod snake;
pub mod state;
pub mod tick;

pub use food::{PlacementError, place_food};
pub use grid::{Cell, Direction};
pub use intent::IntentQueue;
pub use particles::{Particle, ParticleSystem};
pub use snake::{Collision, Snake, StepOutcome};
pub use state::{GamePhase, RenderSnapshot, SimState};
pub use tick::{TickEvent, tick};
