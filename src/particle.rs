//! Particle data and field population.
//!
//! A [`ParticleField`] is seeded for one sized surface and replaced wholesale
//! whenever the surface is resized. Individual particles are never removed;
//! when one outlives its `max_life` it is respawned in place.

use crate::spawn::SpawnRng;
use glam::Vec2;

/// Upper bound on field cardinality.
pub const MAX_PARTICLES: usize = 120;
/// Surface area (in logical pixels²) allotted to each particle.
pub const AREA_PER_PARTICLE: f32 = 15_000.0;
/// Initial velocity components are drawn from `[-SPAWN_SPEED, SPAWN_SPEED]`.
pub const SPAWN_SPEED: f32 = 0.25;
/// Range of `max_life`, drawn at every (re)spawn.
pub const MAX_LIFE_MIN: f32 = 0.5;
pub const MAX_LIFE_MAX: f32 = 1.0;
/// Hue band (degrees) for spawned particles.
pub const HUE_MIN: f32 = 200.0;
pub const HUE_MAX: f32 = 260.0;
/// Radius multiplier range.
pub const SIZE_MIN: f32 = 1.0;
pub const SIZE_MAX: f32 = 3.0;

/// A single glowing particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in logical surface coordinates.
    pub position: Vec2,
    /// Velocity in logical pixels per tick.
    pub velocity: Vec2,
    /// Age, in `[0, max_life]` once a tick has completed.
    pub life: f32,
    /// Lifespan, fixed until the next respawn.
    pub max_life: f32,
    /// Base hue in degrees.
    pub hue: f32,
    /// Glow radius multiplier.
    pub size: f32,
}

impl Particle {
    /// Spawn a particle uniformly inside `bounds`.
    ///
    /// `life` is drawn from `[0, 1)` independently of `max_life`, so a fresh
    /// particle may already be past its lifespan and respawn on its first tick.
    pub fn spawn(bounds: Vec2, rng: &mut SpawnRng) -> Self {
        Self {
            position: rng.point_in(bounds),
            velocity: Vec2::new(
                rng.range(-SPAWN_SPEED, SPAWN_SPEED),
                rng.range(-SPAWN_SPEED, SPAWN_SPEED),
            ),
            life: rng.random(),
            max_life: rng.range(MAX_LIFE_MIN, MAX_LIFE_MAX),
            hue: rng.range(HUE_MIN, HUE_MAX),
            size: rng.range(SIZE_MIN, SIZE_MAX),
        }
    }

    /// Reset in place after outliving `max_life`.
    ///
    /// Velocity and size carry over.
    pub fn respawn(&mut self, bounds: Vec2, rng: &mut SpawnRng) {
        self.position = rng.point_in(bounds);
        self.life = 0.0;
        self.max_life = rng.range(MAX_LIFE_MIN, MAX_LIFE_MAX);
        self.hue = rng.range(HUE_MIN, HUE_MAX);
    }

    /// Fraction of the lifespan used so far.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life > self.max_life
    }
}

/// Number of particles a `width` by `height` surface holds.
pub fn field_capacity(width: f32, height: f32) -> usize {
    let w = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let h = if height.is_finite() { height.max(0.0) } else { 0.0 };
    let by_area = ((w * h) / AREA_PER_PARTICLE).floor() as usize;
    by_area.min(MAX_PARTICLES)
}

/// Ordered particles seeded for one surface size.
///
/// Order is insertion order; it matters only for the renderer's connective
/// line window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
}

impl ParticleField {
    /// Logical bounds the field was seeded for.
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

/// Populate a field for a `width` by `height` logical surface.
///
/// Zero, negative, or non-finite dimensions yield an empty field.
pub fn spawn_field(width: f32, height: f32, rng: &mut SpawnRng) -> ParticleField {
    let count = field_capacity(width, height);
    let bounds = Vec2::new(width, height).max(Vec2::ZERO);
    let bounds = if bounds.is_finite() { bounds } else { Vec2::ZERO };
    let particles = (0..count).map(|_| Particle::spawn(bounds, rng)).collect();
    ParticleField { particles, bounds }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_capacity() {
        assert_eq!(field_capacity(1200.0, 800.0), 64);
        assert_eq!(field_capacity(3840.0, 2160.0), MAX_PARTICLES);
        assert_eq!(field_capacity(100.0, 100.0), 0);
        assert_eq!(field_capacity(0.0, 800.0), 0);
        assert_eq!(field_capacity(-1200.0, -800.0), 0);
        assert_eq!(field_capacity(f32::NAN, 800.0), 0);
    }

    #[test]
    fn test_spawn_field_ranges() {
        let mut rng = SpawnRng::seeded(3);
        let field = spawn_field(1920.0, 1080.0, &mut rng);
        assert_eq!(field.len(), 120);
        assert_eq!(field.bounds(), Vec2::new(1920.0, 1080.0));

        for p in field.iter() {
            assert!(p.position.x >= 0.0 && p.position.x < 1920.0);
            assert!(p.position.y >= 0.0 && p.position.y < 1080.0);
            assert!(p.velocity.x.abs() <= SPAWN_SPEED && p.velocity.y.abs() <= SPAWN_SPEED);
            assert!((0.0..1.0).contains(&p.life));
            assert!((MAX_LIFE_MIN..MAX_LIFE_MAX).contains(&p.max_life));
            assert!((HUE_MIN..HUE_MAX).contains(&p.hue));
            assert!((SIZE_MIN..SIZE_MAX).contains(&p.size));
        }
    }

    #[test]
    fn test_spawn_field_degenerate_dimensions() {
        let mut rng = SpawnRng::seeded(3);
        assert!(spawn_field(0.0, 0.0, &mut rng).is_empty());
        assert!(spawn_field(-5.0, 900.0, &mut rng).is_empty());
    }

    #[test]
    fn test_respawn_keeps_velocity_and_size() {
        let mut rng = SpawnRng::seeded(9);
        let bounds = Vec2::new(400.0, 300.0);
        let mut p = Particle::spawn(bounds, &mut rng);
        p.life = 2.0;
        let (velocity, size) = (p.velocity, p.size);

        p.respawn(bounds, &mut rng);
        assert_eq!(p.life, 0.0);
        assert_eq!(p.velocity, velocity);
        assert_eq!(p.size, size);
        assert!((MAX_LIFE_MIN..MAX_LIFE_MAX).contains(&p.max_life));
        assert!((HUE_MIN..HUE_MAX).contains(&p.hue));
    }

    #[test]
    fn test_some_fresh_particles_start_expired() {
        let mut rng = SpawnRng::seeded(11);
        let field = spawn_field(1920.0, 1080.0, &mut rng);
        assert!(field.iter().any(|p| p.is_expired()));
    }
}
