//! Ephemeral particle bursts for food pickups.
//!
//! Visual-only entities in pixel space. Bursts are appended by the tick
//! path on consumption; integration runs once per animation frame,
//! independent of (and usually far more often than) the logic tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{BURST_COUNT, MAX_PARTICLES, PARTICLE_GRAVITY};

/// A single burst particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, 1.0 down to 0.0
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    pub radius: f32,
}

/// Pool of live particles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Spawn a radial burst centered on `origin` (pixel space): evenly
    /// spaced angles with a small random jitter, randomized speed, decay
    /// and radius.
    pub fn burst(&mut self, origin: Vec2, rng: &mut Pcg32) {
        for i in 0..BURST_COUNT {
            let angle = (std::f32::consts::TAU / BURST_COUNT as f32) * i as f32
                + rng.random_range(0.0..0.4);
            let speed = rng.random_range(1.5..4.0);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                decay: rng.random_range(0.05..0.09),
                radius: rng.random_range(2.0..4.0),
            });
        }

        // Evict the oldest when over the cap
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    /// Advance every live particle by one frame and drop the expired.
    pub fn integrate(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += PARTICLE_GRAVITY;
            p.life -= p.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
