//! Static gradient shown instead of the animation under reduced motion.
//!
//! Five stops along a 135° linear gradient, each coloured by multiplying the
//! tint with fixed per-stop factors, softened by a 40px blur. The constants
//! are relied on by visual-regression captures; keep them exact.

use crate::canvas::{css_number, Canvas, GradientStop, Rgba};
use crate::config::Tint;
use glam::Vec2;

/// Gradient direction in CSS degrees.
pub const GRADIENT_ANGLE: f32 = 135.0;
/// Blur radius applied to the whole layer.
pub const BLUR_RADIUS: f32 = 40.0;

/// Stop positions in percent.
pub const STOP_PERCENTS: [f32; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];
/// Per-stop `[r, g, b]` multipliers applied to the tint.
pub const STOP_MULTIPLIERS: [[f32; 3]; 5] = [
    [100.0, 150.0, 200.0],
    [150.0, 100.0, 180.0],
    [120.0, 160.0, 220.0],
    [80.0, 120.0, 160.0],
    [60.0, 100.0, 140.0],
];
/// Per-stop opacity.
pub const STOP_ALPHAS: [f32; 5] = [0.1, 0.15, 0.1, 0.2, 0.1];

/// The tinted fallback gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticFallback {
    stops: [GradientStop; 5],
}

impl StaticFallback {
    pub fn from_tint(tint: Tint) -> Self {
        let stops = std::array::from_fn(|i| {
            let [r, g, b] = STOP_MULTIPLIERS[i];
            GradientStop {
                offset: STOP_PERCENTS[i] / 100.0,
                color: Rgba::new(r * tint.r(), g * tint.g(), b * tint.b(), STOP_ALPHAS[i]),
            }
        });
        Self { stops }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// CSS `background` value.
    pub fn css_background(&self) -> String {
        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|stop| format!("{} {}%", stop.color.to_css(), css_number(stop.offset * 100.0)))
            .collect();
        format!("linear-gradient({}deg, {})", css_number(GRADIENT_ANGLE), stops.join(", "))
    }

    /// CSS `filter` value.
    pub fn css_filter(&self) -> String {
        format!("blur({}px)", css_number(BLUR_RADIUS))
    }

    /// Paint onto a black base covering `size`, then blur the result so the
    /// border band fades out.
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C, size: Vec2) {
        canvas.fill_rect(Vec2::ZERO, size, Rgba::BLACK);
        canvas.fill_linear_gradient(Vec2::ZERO, size, GRADIENT_ANGLE, &self.stops);
        canvas.blur(BLUR_RADIUS);
    }
}
