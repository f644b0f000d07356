//! Paints a particle field onto a [`Canvas`].
//!
//! A frame is a translucent black wash (leaving fading trails), then for each
//! particle a radial glow and short connective lines to the next few
//! particles in field order.

use crate::canvas::{Canvas, Rgba};
use crate::config::Tint;
use crate::particle::{Particle, ParticleField};
use glam::Vec2;
use std::f32::consts::PI;

/// Opacity of the per-frame black wash.
pub const TRAIL_FADE: f32 = 0.05;
/// Peak particle opacity, reached at mid-life.
pub const PEAK_ALPHA: f32 = 0.6;
/// Hue advance (degrees) over a particle's lifespan.
pub const HUE_SHIFT: f32 = 30.0;
/// Glow radius as a multiple of particle size.
pub const GLOW_RADIUS: f32 = 3.0;
/// How many following particles are checked for connective lines.
pub const LINK_WINDOW: usize = 3;
/// Maximum length of a connective line.
pub const LINK_DISTANCE: f32 = 80.0;
/// Line opacity relative to the particle's alpha.
pub const LINK_OPACITY: f32 = 0.3;
/// Connective line width in logical pixels.
pub const LINK_WIDTH: f32 = 0.5;

const CHANNEL_PHASES: [f32; 3] = [0.0, 2.0, 4.0];

/// Opacity envelope: zero at birth and death, [`PEAK_ALPHA`] at mid-life.
pub fn life_alpha(particle: &Particle) -> f32 {
    let ratio = particle.life_ratio().clamp(0.0, 1.0);
    (ratio * PI).sin() * PEAK_ALPHA
}

/// Tinted RGB for a hue that has advanced `ratio` through its lifespan.
///
/// The shifted hue (in degrees) drives three sine waves offset by 0, 2 and 4
/// radians, each mapped onto `[0, 255]` and multiplied by a tint channel.
pub fn particle_rgb(hue: f32, ratio: f32, tint: Tint) -> [f32; 3] {
    let shift = (hue + ratio * HUE_SHIFT).to_radians();
    let mut rgb = [0.0; 3];
    for (channel, out) in rgb.iter_mut().enumerate() {
        let wave = (shift + CHANNEL_PHASES[channel]).sin() * 0.5 + 0.5;
        *out = wave * 255.0 * tint.0[channel];
    }
    rgb
}

/// Stateless frame painter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Wash the whole surface with translucent black.
    pub fn fade<C: Canvas + ?Sized>(&self, canvas: &mut C, bounds: Vec2) {
        canvas.fill_rect(Vec2::ZERO, bounds, Rgba::BLACK.with_alpha(TRAIL_FADE));
    }

    /// Paint particle `index`: its glow, then lines to the next
    /// [`LINK_WINDOW`] particles that lie within [`LINK_DISTANCE`].
    pub fn draw_particle<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        particles: &[Particle],
        index: usize,
        tint: Tint,
    ) {
        let Some(particle) = particles.get(index) else {
            return;
        };
        let alpha = life_alpha(particle);
        let [r, g, b] = particle_rgb(particle.hue, particle.life_ratio(), tint);

        canvas.fill_radial_glow(
            particle.position,
            particle.size * GLOW_RADIUS,
            Rgba::new(r, g, b, alpha),
        );

        let end = (index + 1 + LINK_WINDOW).min(particles.len());
        for other in &particles[index + 1..end] {
            let distance = particle.position.distance(other.position);
            if distance < LINK_DISTANCE {
                let opacity = (LINK_DISTANCE - distance) / LINK_DISTANCE * alpha * LINK_OPACITY;
                canvas.stroke_line(
                    particle.position,
                    other.position,
                    LINK_WIDTH,
                    Rgba::new(r, g, b, opacity),
                );
            }
        }
    }

    /// Paint a full frame.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, field: &ParticleField, tint: Tint) {
        self.fade(canvas, field.bounds());
        for index in 0..field.len() {
            self.draw_particle(canvas, field.particles(), index, tint);
        }
    }
}
