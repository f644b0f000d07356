//! Pointer-proximity attraction.

use glam::Vec2;

/// Pointer influence radius in logical pixels.
pub const ATTRACT_RADIUS: f32 = 150.0;
/// Impulse scale at zero distance.
pub const ATTRACT_STRENGTH: f32 = 0.001;

/// Velocity delta pulling a particle at `position` toward `pointer`.
///
/// `enabled` folds together mouse interaction, reduced motion, and whether
/// the pointer is currently moving. Falls off linearly to zero at
/// [`ATTRACT_RADIUS`]; a particle exactly on the pointer gets no impulse.
pub fn attraction(position: Vec2, pointer: Vec2, enabled: bool) -> Vec2 {
    if !enabled {
        return Vec2::ZERO;
    }
    let delta = pointer - position;
    let distance = delta.length();
    if distance == 0.0 || distance >= ATTRACT_RADIUS || !distance.is_finite() {
        return Vec2::ZERO;
    }
    let falloff = (ATTRACT_RADIUS - distance) / ATTRACT_RADIUS;
    delta / distance * falloff * ATTRACT_STRENGTH
}
