//! # glowfield
//!
//! A decorative, full-viewport particle backdrop.
//!
//! A field of softly glowing particles drifts across the surface, ages and
//! respawns, draws faint lines to nearby neighbours, and is gently pulled
//! toward the pointer while it moves. When the platform asks for reduced
//! motion the animation is replaced by a static tinted gradient.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowfield::prelude::*;
//! use std::time::Duration;
//!
//! let config = BackdropConfig::new()
//!     .with_tint(Tint::new(0.6, 0.8, 1.0))
//!     .with_speed(1.5);
//!
//! let mut host = HeadlessHost::new(Vec2::new(1280.0, 720.0), 2.0);
//! let mut backdrop = Backdrop::new(config, Some(PixelCanvas::new(0, 0)));
//! backdrop.mount(&mut host);
//! for _ in 0..60 {
//!     host.step(&mut backdrop, Duration::from_millis(16));
//! }
//! backdrop.unmount(&mut host);
//! assert!(host.registry().is_idle());
//! ```
//!
//! ## Core Concepts
//!
//! ### Host
//!
//! A backdrop never touches the platform directly. [`Platform`] supplies the
//! viewport, pixel ratio, motion preference and clock; [`Host`] registers
//! listeners, timeouts and frame requests, and delivers [`HostEvent`]s back.
//! [`HeadlessHost`] runs on a virtual clock; the window shell in [`app`]
//! drives the same backdrop from winit.
//!
//! ### Frame
//!
//! Each frame washes the surface with translucent black (leaving trails),
//! then for every particle in order: age, respawn if expired, apply pointer
//! attraction, integrate, damp, wrap at the edges, draw its glow and its
//! lines to the next few particles.
//!
//! ### Canvas
//!
//! Drawing goes through the [`Canvas`] trait. [`PixelCanvas`] rasterises into
//! an RGBA buffer (presented by [`gpu::Presenter`] or written as PNG by
//! [`snapshot`]); [`RecordingCanvas`] records commands for tests.
//!
//! ## Configuration
//!
//! | Option | Default | Environment |
//! |--------|---------|-------------|
//! | tint | `1,1,1` | `GLOWFIELD_TINT` |
//! | speed | `1.0` | `GLOWFIELD_SPEED` |
//! | mouse | on | `GLOWFIELD_MOUSE` |

pub mod accessibility;
pub mod app;
pub mod backdrop;
pub mod canvas;
pub mod config;
pub mod error;
pub mod fallback;
pub mod forces;
pub mod gpu;
pub mod host;
pub mod input;
pub mod particle;
pub mod raster;
pub mod renderer;
pub mod scheduler;
pub mod simulation;
pub mod snapshot;
pub mod spawn;
pub mod surface;
pub mod time;

pub use accessibility::{AccessibilityGate, MotionMode, MotionTransition};
pub use backdrop::Backdrop;
pub use canvas::{Canvas, DrawCommand, GradientStop, RecordingCanvas, Rgba};
pub use config::{BackdropConfig, Tint};
pub use error::{AppError, ConfigError, GpuError, SnapshotError};
pub use fallback::StaticFallback;
pub use glam::{UVec2, Vec2};
pub use host::{EventKind, HeadlessHost, Host, HostEvent, Platform, Registry};
pub use input::{InputAdapter, PointerState};
pub use particle::{Particle, ParticleField};
pub use raster::PixelCanvas;
pub use renderer::Renderer;
pub use scheduler::FrameScheduler;
pub use simulation::Simulator;
pub use snapshot::{render_snapshot, SnapshotOptions};
pub use spawn::SpawnRng;
pub use surface::{SurfaceController, SurfaceDescriptor};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glowfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::accessibility::MotionMode;
    pub use crate::backdrop::Backdrop;
    pub use crate::canvas::{Canvas, RecordingCanvas, Rgba};
    pub use crate::config::{BackdropConfig, Tint};
    pub use crate::host::{HeadlessHost, Host, HostEvent, Platform};
    pub use crate::raster::PixelCanvas;
    pub use crate::snapshot::{render_snapshot, SnapshotOptions};
    pub use crate::spawn::SpawnRng;
    pub use crate::{UVec2, Vec2};
}
