//! Headless rendering to an image.
//!
//! Mounts a backdrop on a [`HeadlessHost`], runs a fixed number of frames on
//! the virtual clock, and hands back the rasterised result. With a seed the
//! output is reproducible, which makes it usable for visual comparisons.

use crate::backdrop::Backdrop;
use crate::config::BackdropConfig;
use crate::error::SnapshotError;
use crate::host::HeadlessHost;
use crate::raster::PixelCanvas;
use crate::spawn::SpawnRng;
use glam::Vec2;
use std::path::PathBuf;
use std::time::Duration;

/// Virtual time between snapshot frames.
pub const SNAPSHOT_FRAME: Duration = Duration::from_millis(16);

/// What to render and where to put it.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Frames to run before capturing.
    pub frames: u32,
    /// Logical viewport size.
    pub viewport: Vec2,
    pub device_pixel_ratio: f32,
    /// Seed for spawn randomness; entropy when `None`.
    pub seed: Option<u64>,
    /// Render the static fallback instead of the animation.
    pub reduced_motion: bool,
    /// Write a PNG here when set.
    pub output: Option<PathBuf>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            frames: 120,
            viewport: Vec2::new(800.0, 600.0),
            device_pixel_ratio: 1.0,
            seed: None,
            reduced_motion: false,
            output: None,
        }
    }
}

/// Render a backdrop headlessly and return the final frame.
pub fn render_snapshot(config: BackdropConfig, options: &SnapshotOptions) -> Result<PixelCanvas, SnapshotError> {
    let mut host = HeadlessHost::new(options.viewport, options.device_pixel_ratio)
        .with_reduced_motion(options.reduced_motion);
    let rng = options.seed.map(SpawnRng::seeded).unwrap_or_default();
    let mut backdrop = Backdrop::new(config, Some(PixelCanvas::new(0, 0))).with_rng(rng);

    backdrop.mount(&mut host);
    for _ in 0..options.frames {
        host.step(&mut backdrop, SNAPSHOT_FRAME);
    }
    let ticks = backdrop.ticks();
    backdrop.unmount(&mut host);

    let canvas = backdrop.into_canvas().unwrap_or_else(|| PixelCanvas::new(0, 0));
    log::info!(
        "rendered {}x{} snapshot after {} frames",
        canvas.width(),
        canvas.height(),
        ticks
    );

    if let Some(path) = &options.output {
        canvas.save_png(path)?;
        log::info!("wrote {}", path.display());
    }
    Ok(canvas)
}
