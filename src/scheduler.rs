//! Frame loop handle.
//!
//! The loop is "request a frame, run it, request the next". The pending
//! [`FrameId`] doubles as the cancellation token: a frame whose id is not the
//! one currently held is never run, so a stop takes effect immediately even if
//! the host had already queued the callback.

use crate::host::{FrameId, Host};

/// Owns at most one outstanding frame request.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Option<FrameId>,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame request is outstanding.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames accepted since creation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Request the next frame. Returns false if one is already pending.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(host.request_frame());
        true
    }

    /// Cancel the outstanding request, if any. Safe to call repeatedly.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.pending.take() {
            host.cancel_frame(id);
        }
    }

    /// Claim a delivered frame. True only for the outstanding request, which
    /// is consumed; the caller runs the tick and calls [`start`](Self::start)
    /// again to continue.
    pub fn accept(&mut self, id: FrameId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            self.ticks += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessHost, HostEvent};
    use glam::Vec2;

    fn host() -> HeadlessHost {
        HeadlessHost::new(Vec2::new(800.0, 600.0), 1.0)
    }

    #[test]
    fn test_start_is_not_reentrant() {
        let mut host = host();
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.start(&mut host));
        assert!(!scheduler.start(&mut host));
        assert_eq!(host.registry().frame_count(), 1);
    }

    #[test]
    fn test_stop_idempotent() {
        let mut host = host();
        let mut scheduler = FrameScheduler::new();
        scheduler.stop(&mut host);
        scheduler.start(&mut host);
        scheduler.stop(&mut host);
        scheduler.stop(&mut host);
        assert!(!scheduler.is_running());
        assert!(host.registry().is_idle());
    }

    #[test]
    fn test_accept_only_pending() {
        let mut host = host();
        let mut scheduler = FrameScheduler::new();
        scheduler.start(&mut host);
        let frames = host.animation_frame();
        let HostEvent::Frame(id) = frames[0] else {
            panic!("expected a frame event");
        };

        assert!(scheduler.accept(id));
        assert!(!scheduler.accept(id));
        assert_eq!(scheduler.ticks(), 1);
    }

    #[test]
    fn test_stale_frame_after_stop_rejected() {
        let mut host = host();
        let mut scheduler = FrameScheduler::new();
        scheduler.start(&mut host);
        // Host already collected the callback for this display frame...
        let frames = host.animation_frame();
        // ...then the loop is stopped before it runs.
        scheduler.stop(&mut host);
        for event in frames {
            if let HostEvent::Frame(id) = event {
                assert!(!scheduler.accept(id));
            }
        }
        assert_eq!(scheduler.ticks(), 0);
    }
}
