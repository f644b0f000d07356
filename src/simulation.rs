//! Per-tick particle integration.
//!
//! Each tick, every particle in field order goes through the same five steps:
//!
//! 1. age, respawning in the same tick when `life > max_life`
//! 2. pointer attraction added to velocity
//! 3. `position += velocity * speed`
//! 4. drag (`velocity *= DRAG`)
//! 5. toroidal wrap back into the surface
//!
//! Real frame time is not used: one tick is one displayed frame.

use crate::forces;
use crate::particle::{Particle, ParticleField};
use crate::spawn::SpawnRng;
use glam::Vec2;

/// Life gained per tick at speed 1.0.
pub const AGE_RATE: f32 = 0.005;
/// Velocity retained per tick.
pub const DRAG: f32 = 0.998;

/// Advances particles one tick at a configurable speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    speed: f32,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl Simulator {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Advance a single particle.
    ///
    /// `attracting` is true only when pointer interaction is enabled, motion is
    /// not reduced, and the pointer is currently moving.
    pub fn step_particle(
        &self,
        particle: &mut Particle,
        pointer: Vec2,
        attracting: bool,
        bounds: Vec2,
        rng: &mut SpawnRng,
    ) {
        particle.life += AGE_RATE * self.speed;
        if particle.is_expired() {
            particle.respawn(bounds, rng);
        }

        particle.velocity += forces::attraction(particle.position, pointer, attracting);
        particle.position += particle.velocity * self.speed;
        particle.velocity *= DRAG;

        particle.position.x = wrap(particle.position.x, bounds.x);
        particle.position.y = wrap(particle.position.y, bounds.y);
    }

    /// Advance the whole field in insertion order.
    pub fn step(&self, field: &mut ParticleField, pointer: Vec2, attracting: bool, rng: &mut SpawnRng) {
        let bounds = field.bounds();
        for particle in field.particles_mut() {
            self.step_particle(particle, pointer, attracting, bounds, rng);
        }
    }
}

/// Wrap `value` into `[0, extent]`, looping for overshoots of any size.
pub fn wrap(value: f32, extent: f32) -> f32 {
    if extent.is_nan() || extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    if (0.0..=extent).contains(&value) {
        value
    } else {
        value.rem_euclid(extent)
    }
}
