//! Software rasterizer backing the window and snapshots.
//!
//! Pixels are straight-alpha RGBA8 over an opaque black base, blended
//! source-over like a 2D canvas context. Drawing commands arrive in logical
//! coordinates and are scaled by the configured device pixel ratio.

use crate::canvas::{Canvas, GradientStop, Rgba};
use crate::error::SnapshotError;
use glam::{UVec2, Vec2};
use std::path::Path;

/// Box passes per axis approximating a Gaussian.
const BLUR_PASSES: usize = 3;

/// An RGBA8 pixel buffer implementing [`Canvas`].
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    scale: f32,
    pixels: Vec<[u8; 4]>,
}

impl PixelCanvas {
    /// Create an opaque black canvas of `width` by `height` device pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
            pixels: vec![[0, 0, 0, 255]; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at device coordinates, if in range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Encode the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.pixels().to_vec())
            .ok_or(SnapshotError::BufferSize {
                width: self.width,
                height: self.height,
            })?;
        image.save(path)?;
        Ok(())
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, r: f32, g: f32, b: f32, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let px = &mut self.pixels[(y * self.width + x) as usize];
        let inv = 1.0 - alpha;
        // Rounding stalls faint fades: a channel at 10 or below never drops
        // under the 0.05 trail fade, leaving dim ghosts as a 2D canvas does.
        px[0] = (r.clamp(0.0, 255.0) * alpha + px[0] as f32 * inv).round() as u8;
        px[1] = (g.clamp(0.0, 255.0) * alpha + px[1] as f32 * inv).round() as u8;
        px[2] = (b.clamp(0.0, 255.0) * alpha + px[2] as f32 * inv).round() as u8;
        px[3] = 255;
    }

    /// Device-pixel bounding box `[x0, x1) x [y0, y1)` of a logical-space box, clipped.
    fn device_box(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let min = (min * self.scale).floor().max(Vec2::ZERO);
        let max = (max * self.scale)
            .ceil()
            .min(Vec2::new(self.width as f32, self.height as f32));
        if !(min.x < max.x && min.y < max.y) {
            return None;
        }
        Some((min.x as u32, min.y as u32, max.x as u32, max.y as u32))
    }
}

impl Canvas for PixelCanvas {
    fn configure(&mut self, backing: UVec2, scale: f32) {
        self.width = backing.x;
        self.height = backing.y;
        self.scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        self.pixels.clear();
        self.pixels
            .resize((backing.x as usize) * (backing.y as usize), [0, 0, 0, 255]);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.device_box(origin, origin + size) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color.r, color.g, color.b, color.a);
            }
        }
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || color.a <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.device_box(center - radius, center + radius) else {
            return;
        };
        let c = center * self.scale;
        let r = radius * self.scale;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = p.distance(c) / r;
                if t < 1.0 {
                    self.blend(x, y, color.r, color.g, color.b, color.a * (1.0 - t));
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let a = from * self.scale;
        let b = to * self.scale;
        let half = (width * self.scale).max(1.0) * 0.5;
        let pad = Vec2::splat(half + 1.0) / self.scale;
        let Some((x0, y0, x1, y1)) = self.device_box(from.min(to) - pad, from.max(to) + pad) else {
            return;
        };
        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = p.distance(a + ab * t);
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color.r, color.g, color.b, color.a * coverage);
                }
            }
        }
    }

    fn fill_linear_gradient(&mut self, origin: Vec2, size: Vec2, angle_deg: f32, stops: &[GradientStop]) {
        if stops.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.device_box(origin, origin + size) else {
            return;
        };
        // CSS: direction (sin a, -cos a) in y-down space; line length spans the box corners.
        let angle = angle_deg.to_radians();
        let dir = Vec2::new(angle.sin(), -angle.cos());
        let device_size = size * self.scale;
        let length = (device_size.x * dir.x).abs() + (device_size.y * dir.y).abs();
        let center = (origin + size * 0.5) * self.scale;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if length > 0.0 {
                    (p - center).dot(dir) / length + 0.5
                } else {
                    0.0
                };
                let color = sample_gradient(stops, t);
                self.blend(x, y, color.r, color.g, color.b, color.a);
            }
        }
    }

    fn blur(&mut self, radius: f32) {
        let sigma = radius * self.scale;
        if !(sigma.is_finite() && sigma > 0.0) {
            return;
        }
        // Three box passes of width w have variance 3 (w² - 1) / 12 = σ².
        let r = (((4.0 * sigma * sigma + 1.0).sqrt() - 1.0) * 0.5).round() as usize;
        let (w, h) = (self.width as usize, self.height as usize);
        if r == 0 || w == 0 || h == 0 {
            return;
        }

        let mut scratch = vec![0.0f32; w * h];
        for c in 0..3 {
            let mut channel: Vec<f32> = self.pixels.iter().map(|px| px[c] as f32).collect();
            for _ in 0..BLUR_PASSES {
                box_pass(&channel, &mut scratch, h, w, w, 1, r);
                box_pass(&scratch, &mut channel, w, h, 1, w, r);
            }
            for (px, value) in self.pixels.iter_mut().zip(&channel) {
                px[c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// One box-filter pass over `lines` runs of `len` samples each.
///
/// Line `i` starts at `i * line_stride` and advances by `step`. Samples
/// outside a line are zero.
fn box_pass(src: &[f32], dst: &mut [f32], lines: usize, len: usize, line_stride: usize, step: usize, r: usize) {
    let norm = 1.0 / (2 * r + 1) as f32;
    for line in 0..lines {
        let base = line * line_stride;
        let mut sum = 0.0;
        for i in 0..=r.min(len - 1) {
            sum += src[base + i * step];
        }
        for i in 0..len {
            dst[base + i * step] = sum * norm;
            if i + r + 1 < len {
                sum += src[base + (i + r + 1) * step];
            }
            if i >= r {
                sum -= src[base + (i - r) * step];
            }
        }
    }
}

/// Colour of a gradient at `t`, clamped to the first and last stops.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::new(0.0, 0.0, 0.0, 0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.offset {
            let span = hi.offset - lo.offset;
            let k = if span > 0.0 { (t - lo.offset) / span } else { 1.0 };
            return Rgba::new(
                lo.color.r + (hi.color.r - lo.color.r) * k,
                lo.color.g + (hi.color.g - lo.color.g) * k,
                lo.color.b + (hi.color.b - lo.color.b) * k,
                lo.color.a + (hi.color.a - lo.color.a) * k,
            );
        }
    }
    stops[stops.len() - 1].color
}
