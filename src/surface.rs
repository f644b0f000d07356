//! DPI-aware surface sizing.
//!
//! The backing store is `viewport * dpr` device pixels, the drawing transform
//! scales by `dpr`, and the particle field is seeded from the unscaled logical
//! viewport. Every resize replaces the field wholesale; the last resize wins.

use crate::canvas::Canvas;
use crate::host::Platform;
use crate::particle::{spawn_field, ParticleField};
use crate::spawn::SpawnRng;
use glam::{UVec2, Vec2};

/// Logical size, pixel density, and resulting backing-store resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDescriptor {
    /// Unscaled viewport size; also the CSS/window logical size.
    pub logical: Vec2,
    pub device_pixel_ratio: f32,
    /// Backing-store resolution in device pixels.
    pub backing: UVec2,
}

impl SurfaceDescriptor {
    /// Describe a surface for `viewport` at `dpr`.
    ///
    /// Negative or non-finite sizes collapse to zero; an unusable ratio is
    /// treated as 1.
    pub fn new(viewport: Vec2, dpr: f32) -> Self {
        let logical = if viewport.is_finite() {
            viewport.max(Vec2::ZERO)
        } else {
            Vec2::ZERO
        };
        let device_pixel_ratio = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let backing = (logical * device_pixel_ratio).floor();
        Self {
            logical,
            device_pixel_ratio,
            backing: UVec2::new(backing.x as u32, backing.y as u32),
        }
    }
}

/// Owns the surface description and the field seeded for it.
#[derive(Debug, Clone, Default)]
pub struct SurfaceController {
    descriptor: Option<SurfaceDescriptor>,
    field: ParticleField,
    resizes: u64,
}

impl SurfaceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current description, once the surface has been sized.
    pub fn descriptor(&self) -> Option<&SurfaceDescriptor> {
        self.descriptor.as_ref()
    }

    /// Logical bounds, or zero before the first resize.
    pub fn bounds(&self) -> Vec2 {
        self.descriptor.map(|d| d.logical).unwrap_or(Vec2::ZERO)
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    /// Number of times the surface has been (re)sized.
    pub fn resizes(&self) -> u64 {
        self.resizes
    }

    /// Reconcile with the platform's current viewport and pixel ratio.
    ///
    /// The canvas, when present, is reconfigured to the new backing store and
    /// scale; the field is always reseeded from the logical size.
    pub fn resize<P, C>(&mut self, platform: &P, canvas: Option<&mut C>, rng: &mut SpawnRng) -> SurfaceDescriptor
    where
        P: Platform + ?Sized,
        C: Canvas + ?Sized,
    {
        let descriptor = SurfaceDescriptor::new(platform.viewport_size(), platform.device_pixel_ratio());
        if let Some(canvas) = canvas {
            canvas.configure(descriptor.backing, descriptor.device_pixel_ratio);
        }
        self.field = spawn_field(descriptor.logical.x, descriptor.logical.y, rng);
        self.descriptor = Some(descriptor);
        self.resizes += 1;

        log::debug!(
            "surface {}x{} @{}x -> backing {}x{}, {} particles",
            descriptor.logical.x,
            descriptor.logical.y,
            descriptor.device_pixel_ratio,
            descriptor.backing.x,
            descriptor.backing.y,
            self.field.len()
        );
        descriptor
    }
}
