//! 2D drawing surface abstraction.
//!
//! The renderer and the static fallback only ever talk to a [`Canvas`]. The
//! software [`PixelCanvas`](crate::raster::PixelCanvas) backs the window and
//! snapshots; [`RecordingCanvas`] captures commands for headless tests.
//!
//! All coordinates are logical. A canvas configured with `scale = dpr` maps
//! them onto its backing store.

use glam::{UVec2, Vec2};

/// A colour with channels in `[0, 255]` and alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` notation.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            css_number(self.r),
            css_number(self.g),
            css_number(self.b),
            css_number(self.a)
        )
    }
}

/// Format a number for CSS with at most three decimals and no trailing zeros.
pub(crate) fn css_number(value: f32) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// One colour stop along a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient line, `0.0..=1.0`.
    pub offset: f32,
    pub color: Rgba,
}

/// A 2D immediate-mode drawing context.
pub trait Canvas {
    /// Reset the backing store to `backing` device pixels and apply a uniform
    /// `scale` transform for subsequent commands.
    fn configure(&mut self, backing: UVec2, scale: f32);

    /// Blend a solid rectangle over the surface.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    /// Soft glow: `color` at the centre fading to transparent at `radius`.
    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Straight line segment of the given logical width.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// CSS-style linear gradient over a rectangle; `angle_deg` follows CSS
    /// convention (0 = towards the top, 90 = towards the right).
    fn fill_linear_gradient(&mut self, origin: Vec2, size: Vec2, angle_deg: f32, stops: &[GradientStop]);

    /// Gaussian blur of the whole surface, `radius` being the logical standard
    /// deviation as in CSS `blur()`. Content past the edges counts as black.
    fn blur(&mut self, radius: f32);
}

/// A recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Configure { backing: UVec2, scale: f32 },
    FillRect { origin: Vec2, size: Vec2, color: Rgba },
    RadialGlow { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    LinearGradient { origin: Vec2, size: Vec2, angle_deg: f32, stops: Vec<GradientStop> },
    Blur { radius: f32 },
}

/// Canvas that records every command instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn glow_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::RadialGlow { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn configure(&mut self, backing: UVec2, scale: f32) {
        self.commands.push(DrawCommand::Configure { backing, scale });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { origin, size, color });
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::RadialGlow { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn fill_linear_gradient(&mut self, origin: Vec2, size: Vec2, angle_deg: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::LinearGradient {
            origin,
            size,
            angle_deg,
            stops: stops.to_vec(),
        });
    }

    fn blur(&mut self, radius: f32) {
        self.commands.push(DrawCommand::Blur { radius });
    }
}
