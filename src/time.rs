//! Frame counting and FPS measurement.
//!
//! The simulation does not use frame time (one tick is one frame), so this
//! clock exists only to report how fast frames are actually arriving.
//! Timestamps come from [`Platform::now`](crate::host::Platform::now), which
//! keeps it testable with a virtual clock.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! clock.tick(host.now());
//! log::debug!("{:.1} fps over {} frames", clock.fps(), clock.frames());
//! ```

use std::time::Duration;

/// Frame counter with an FPS estimate refreshed periodically.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total frames ticked.
    frames: u64,
    /// FPS over the most recent full window.
    fps: f32,
    /// Frame count when the current window began.
    window_frames: u64,
    /// Timestamp when the current window began.
    window_start: Option<Duration>,
    /// How often to recompute FPS.
    interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frames: 0,
            fps: 0.0,
            window_frames: 0,
            window_start: None,
            interval,
        }
    }

    /// Record a frame at `now`. Returns true when the FPS estimate was refreshed.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.frames += 1;
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.window_frames = self.frames;
            return false;
        };

        let elapsed = now.saturating_sub(start);
        if elapsed < self.interval || elapsed.is_zero() {
            return false;
        }
        let frames_since = self.frames - self.window_frames;
        self.fps = frames_since as f32 / elapsed.as_secs_f32();
        self.window_frames = self.frames;
        self.window_start = Some(now);
        true
    }

    /// Total frames since creation or the last reset.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent FPS estimate (0 until one full interval has passed).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Forget the measurement window, e.g. after the loop was paused.
    pub fn reset_window(&mut self) {
        self.window_start = None;
        self.fps = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
