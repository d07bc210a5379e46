//! Per-tick resolution: intent consumption, movement, collision and
//! scoring.
//!
//! One call advances the snake by exactly one cell. The tick mutates
//! simulation state and reports what happened as events; scheduling,
//! persistence and drawing are the host's reaction to those events.

use crate::consts::{MIN_SPEED_MS, POINTS_PER_LEVEL, SPEED_STEP_MS};

use super::food::{PlacementError, place_food};
use super::grid::Cell;
use super::snake::Collision;
use super::state::{GamePhase, SimState};

/// What a tick did, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Food at this cell was eaten; a particle burst was spawned there
    Ate(Cell),
    /// Level went up; the logic loop must be restarted at the new interval
    SpeedChanged { speed_ms: u32 },
    /// Best score improved; persist it
    NewBest(u32),
    /// Wall or self collision; phase is now Dead
    Died { score: u32, best: u32 },
}

/// Advance the simulation by one tick.
///
/// A no-op outside Playing, so a timer firing scheduled before a
/// stop/restart lands harmlessly. The only error is the (practically
/// unreachable) grid-full placement failure.
pub fn tick(state: &mut SimState) -> Result<Vec<TickEvent>, PlacementError> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return Ok(events);
    }

    state.direction = state.intents.consume(state.direction);
    let outcome = state.snake.advance(state.direction, state.food);

    if outcome.collision != Collision::None {
        state.phase = GamePhase::Dead;
        events.push(TickEvent::Died {
            score: state.score,
            best: state.best,
        });
        return Ok(events);
    }

    if outcome.ate {
        state.score += 1;
        events.push(TickEvent::Ate(state.food));
        let origin = state.food.center_px();
        state.particles.burst(origin, &mut state.rng);

        if state.score % POINTS_PER_LEVEL == 0 {
            state.level += 1;
            state.speed_ms = state.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
            events.push(TickEvent::SpeedChanged {
                speed_ms: state.speed_ms,
            });
        }

        if state.score > state.best {
            state.best = state.score;
            events.push(TickEvent::NewBest(state.best));
        }

        state.food = place_food(&mut state.rng, &state.snake)?;
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{INITIAL_SNAKE_LEN, INITIAL_SPEED_MS};
    use crate::sim::grid::Direction;
    use crate::sim::snake::Snake;
    use proptest::prelude::*;

    fn playing_state(seed: u64) -> SimState {
        let mut state = SimState::new(seed, 0).unwrap();
        state.start(seed).unwrap();
        state
    }

    /// Park the food where the default snake cannot reach it in one tick
    fn park_food(state: &mut SimState) {
        state.food = Cell::new(0, 19);
    }

    #[test]
    fn test_eat_grows_scores_and_relocates_food() {
        let mut state = playing_state(11);
        // Default body (10,10),(9,10),(8,10) heading right, food ahead
        state.food = Cell::new(11, 10);

        let events = tick(&mut state).unwrap();

        assert_eq!(state.snake.len(), INITIAL_SNAKE_LEN + 1);
        assert_eq!(state.snake.head(), Cell::new(11, 10));
        assert_eq!(state.score, 1);
        assert!(events.contains(&TickEvent::Ate(Cell::new(11, 10))));
        assert!(events.contains(&TickEvent::NewBest(1)));
        // Food relocated off the grown snake
        assert!(!state.snake.contains(state.food));
        assert_ne!(state.food, Cell::new(11, 10));
        // Burst spawned at the eaten cell
        assert!(state.particles.is_active());
    }

    #[test]
    fn test_plain_move_changes_nothing_else() {
        let mut state = playing_state(12);
        park_food(&mut state);
        let food_before = state.food;

        let events = tick(&mut state).unwrap();

        assert!(events.is_empty());
        assert_eq!(state.snake.len(), INITIAL_SNAKE_LEN);
        assert_eq!(state.score, 0);
        assert_eq!(state.food, food_before);
        assert!(!state.particles.is_active());
    }

    #[test]
    fn test_wall_collision_kills() {
        let mut state = playing_state(13);
        park_food(&mut state);
        // Head against the left wall, body trailing right, heading left
        state.snake = Snake::spawn(Cell::new(0, 5), Direction::Left, 3);
        state.direction = Direction::Left;
        state.intents.clear();

        let events = tick(&mut state).unwrap();

        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(events, vec![TickEvent::Died { score: 0, best: 0 }]);

        // Dead state ignores further ticks entirely
        let snake_len = state.snake.len();
        assert!(tick(&mut state).unwrap().is_empty());
        assert_eq!(state.snake.len(), snake_len);
        assert_eq!(state.phase, GamePhase::Dead);
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = SimState::new(14, 0).unwrap();
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(tick(&mut state).unwrap().is_empty());
        assert_eq!(state.snake.head(), Cell::new(10, 10));
    }

    #[test]
    fn test_level_up_every_five_points() {
        let mut state = playing_state(15);
        state.score = 4;
        state.food = state.snake.head().step(Direction::Right);

        let events = tick(&mut state).unwrap();

        assert_eq!(state.score, 5);
        assert_eq!(state.level, 2);
        assert_eq!(state.speed_ms, INITIAL_SPEED_MS - 12);
        assert!(events.contains(&TickEvent::SpeedChanged { speed_ms: 118 }));
    }

    #[test]
    fn test_speed_floor() {
        let mut state = playing_state(16);
        state.score = 34;
        state.level = 7;
        state.speed_ms = 58;
        state.food = state.snake.head().step(Direction::Right);

        tick(&mut state).unwrap();

        assert_eq!(state.level, 8);
        assert_eq!(state.speed_ms, 55);

        // Further level-ups stay at the floor
        state.score = 39;
        state.food = state.snake.head().step(Direction::Right);
        tick(&mut state).unwrap();
        assert_eq!(state.speed_ms, 55);
    }

    #[test]
    fn test_best_only_rises() {
        let mut state = SimState::new(17, 10).unwrap();
        state.start(17).unwrap();
        state.food = state.snake.head().step(Direction::Right);

        let events = tick(&mut state).unwrap();
        assert_eq!(state.best, 10);
        assert!(!events.iter().any(|e| matches!(e, TickEvent::NewBest(_))));
    }

    #[test]
    fn test_pending_direction_applies_at_tick() {
        let mut state = playing_state(18);
        park_food(&mut state);
        assert!(state.request_direction(Direction::Up));
        // A reversal of the *current* heading is still refused
        assert!(!state.request_direction(Direction::Left));

        tick(&mut state).unwrap();
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.snake.head(), Cell::new(10, 9));
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and input script stay identical
        let mut a = playing_state(99999);
        let mut b = playing_state(99999);

        let script = [
            Some(Direction::Up),
            None,
            Some(Direction::Left),
            None,
            Some(Direction::Down),
            None,
            None,
        ];

        for dir in script {
            if let Some(dir) = dir {
                a.request_direction(dir);
                b.request_direction(dir);
            }
            tick(&mut a).unwrap();
            tick(&mut b).unwrap();
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.food, b.food);
        assert_eq!(a.snake.head(), b.snake.head());
    }

    proptest! {
        /// Any input script keeps every invariant: cells in bounds, no
        /// duplicate body cells, food disjoint from the snake, score
        /// tracking growth, speed never below the floor.
        #[test]
        fn prop_invariants_hold(seed in 0u64..10_000, script in proptest::collection::vec(0u8..4, 0..120)) {
            let mut state = playing_state(seed);

            for byte in script {
                let dir = match byte {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                state.request_direction(dir);
                tick(&mut state).unwrap();

                let cells: Vec<Cell> = state.snake.cells().collect();
                prop_assert!(cells.iter().all(|c| c.in_bounds()));
                let mut deduped = cells.clone();
                deduped.sort_by_key(|c| (c.x, c.y));
                deduped.dedup();
                prop_assert_eq!(deduped.len(), cells.len());
                prop_assert!(!state.snake.contains(state.food));
                prop_assert_eq!(state.snake.len() as u32, INITIAL_SNAKE_LEN as u32 + state.score);
                prop_assert!(state.speed_ms >= crate::consts::MIN_SPEED_MS);

                if state.phase == GamePhase::Dead {
                    break;
                }
            }
        }
    }
}
