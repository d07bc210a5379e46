//! Dual-loop scheduling: a fixed-interval logic timer and a per-frame
//! animation driver, both polled from the host's frame callback.
//!
//! The logic timer fires every `speed_ms` while a game is playing; each
//! firing drives exactly one tick. Speed changes go through the restart
//! protocol: cancel, reschedule at the new interval, no carry-over of
//! partial elapsed time. Every (re)schedule bumps a generation counter so
//! a firing scheduled before a stop or restart can be recognized as stale
//! and dropped instead of racing the new schedule.

use crate::sim::state::{GamePhase, SimState};

/// Token for one logic-timer firing, tagged with the generation it was
/// scheduled under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub generation: u64,
}

/// Fixed-interval logic timer
#[derive(Debug, Clone)]
pub struct LogicTimer {
    interval_ms: f64,
    next_due_ms: f64,
    generation: u64,
    running: bool,
}

impl Default for LogicTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicTimer {
    pub fn new() -> Self {
        Self {
            interval_ms: 0.0,
            next_due_ms: 0.0,
            generation: 0,
            running: false,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Schedule the first firing one `interval_ms` after `now_ms`
    pub fn start(&mut self, now_ms: f64, interval_ms: u32) {
        self.generation += 1;
        self.interval_ms = f64::from(interval_ms);
        self.next_due_ms = now_ms + self.interval_ms;
        self.running = true;
    }

    /// Restart protocol: cancel and reschedule at a new interval. The next
    /// firing is a full new interval away regardless of time already
    /// elapsed on the old schedule.
    pub fn restart(&mut self, now_ms: f64, interval_ms: u32) {
        self.start(now_ms, interval_ms);
    }

    /// Cancel. Firings still in flight fail the generation check.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.running = false;
    }

    /// Poll at `now_ms`. Yields at most one firing per call; after a long
    /// stall the schedule resynchronizes instead of firing a backlog
    /// (drift is accepted, not compensated).
    pub fn poll(&mut self, now_ms: f64) -> Option<TimerFire> {
        if !self.running || now_ms < self.next_due_ms {
            return None;
        }
        self.next_due_ms += self.interval_ms;
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms + self.interval_ms;
        }
        Some(TimerFire {
            generation: self.generation,
        })
    }

    /// Whether a firing belongs to the current schedule
    pub fn accepts(&self, fire: TimerFire) -> bool {
        self.running && fire.generation == self.generation
    }
}

/// What the host should repaint after a loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing changed
    Skip,
    /// Food pulse and particle overlay only
    FoodPulse,
    /// Whole playfield
    Full,
}

/// One animation-loop iteration. Runs every frame regardless of phase so
/// a restart is instant, but only Playing does simulation work: particle
/// integration plus a lightweight redraw request, escalating to a full
/// redraw while particles are live.
pub fn animation_frame(state: &mut SimState) -> Redraw {
    if state.phase != GamePhase::Playing {
        return Redraw::Skip;
    }

    state.particles.integrate();
    if state.particles.is_active() {
        Redraw::Full
    } else {
        Redraw::FoodPulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SimState;
    use glam::Vec2;

    #[test]
    fn test_timer_fires_on_interval() {
        let mut timer = LogicTimer::new();
        timer.start(1000.0, 130);

        assert_eq!(timer.poll(1000.0), None);
        assert_eq!(timer.poll(1129.9), None);

        let fire = timer.poll(1130.0).expect("due");
        assert!(timer.accepts(fire));
        // Not due again until a full interval later
        assert_eq!(timer.poll(1131.0), None);
        assert!(timer.poll(1260.0).is_some());
    }

    #[test]
    fn test_restart_reschedules_without_carry_over() {
        let mut timer = LogicTimer::new();
        timer.start(0.0, 130);

        // 100ms into the old interval, restart at a faster speed
        let stale_fire = TimerFire {
            generation: timer.generation(),
        };
        timer.restart(100.0, 55);

        // The old generation is dead
        assert!(!timer.accepts(stale_fire));
        // Next firing is a full new interval after the restart
        assert_eq!(timer.poll(130.0), None);
        assert!(timer.poll(155.0).is_some());
    }

    #[test]
    fn test_stop_rejects_in_flight_fires() {
        let mut timer = LogicTimer::new();
        timer.start(0.0, 130);
        let fire = timer.poll(130.0).expect("due");

        timer.stop();
        assert!(!timer.accepts(fire));
        assert_eq!(timer.poll(1000.0), None);
    }

    #[test]
    fn test_long_stall_resynchronizes() {
        let mut timer = LogicTimer::new();
        timer.start(0.0, 100);

        // A 1-second stall yields one firing, not a backlog of ten
        assert!(timer.poll(1000.0).is_some());
        assert_eq!(timer.poll(1001.0), None);
        assert!(timer.poll(1100.0).is_some());
    }

    #[test]
    fn test_animation_frame_idle_does_nothing() {
        let mut state = SimState::new(1, 0).unwrap();
        assert_eq!(animation_frame(&mut state), Redraw::Skip);

        state.start(1).unwrap();
        state.phase = crate::sim::state::GamePhase::Dead;
        assert_eq!(animation_frame(&mut state), Redraw::Skip);
    }

    #[test]
    fn test_animation_frame_integrates_particles() {
        let mut state = SimState::new(2, 0).unwrap();
        state.start(2).unwrap();
        assert_eq!(animation_frame(&mut state), Redraw::FoodPulse);

        let mut rng = state.rng.clone();
        state.particles.burst(Vec2::new(100.0, 100.0), &mut rng);
        assert_eq!(animation_frame(&mut state), Redraw::Full);

        // Particles burn out and the frame drops back to the light redraw
        for _ in 0..30 {
            animation_frame(&mut state);
        }
        assert_eq!(animation_frame(&mut state), Redraw::FoodPulse);
    }
}
