//! Pointer and touch tracking.
//!
//! [`InputAdapter`] keeps the last pointer position and an "is moving" flag.
//! Every move (re)arms a single decay timeout; when it fires without another
//! move in between, the flag clears. The timeout handle is a single slot:
//! a new move cancels the pending decay before scheduling the next one.

use crate::host::{Host, TimerId};
use glam::Vec2;
use std::time::Duration;

/// Inactivity after which the pointer stops counting as moving.
pub const POINTER_DECAY: Duration = Duration::from_millis(100);

/// Latest pointer state, read by the simulation each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Logical position of the last pointer or touch move.
    pub position: Vec2,
    /// True until [`POINTER_DECAY`] passes without movement.
    pub is_moving: bool,
}

/// Tracks pointer/touch movement with a debounced decay.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    pointer: PointerState,
    decay: Option<TimerId>,
    enabled: bool,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InputAdapter {
    pub fn new(enabled: bool) -> Self {
        Self {
            pointer: PointerState::default(),
            decay: None,
            enabled,
        }
    }

    #[inline]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a decay timeout is pending.
    #[inline]
    pub fn decay_pending(&self) -> bool {
        self.decay.is_some()
    }

    /// Enable or disable tracking. Disabling behaves like [`reset`](Self::reset).
    pub fn set_enabled<H: Host + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        if !enabled {
            self.reset(host);
        }
        self.enabled = enabled;
    }

    /// Record a pointer move.
    pub fn on_pointer_move<H: Host + ?Sized>(&mut self, host: &mut H, position: Vec2) {
        if !self.enabled {
            return;
        }
        self.pointer.position = position;
        self.pointer.is_moving = true;
        self.rearm(host);
    }

    /// Record a touch move. A touch without a contact point maps to the origin.
    pub fn on_touch_move<H: Host + ?Sized>(&mut self, host: &mut H, contact: Option<Vec2>) {
        self.on_pointer_move(host, contact.unwrap_or(Vec2::ZERO));
    }

    /// Handle a fired timeout. Returns true if it was this adapter's decay.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.decay == Some(id) {
            self.decay = None;
            self.pointer.is_moving = false;
            true
        } else {
            false
        }
    }

    /// Cancel any pending decay and stop counting as moving.
    pub fn reset<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.decay.take() {
            host.clear_timeout(id);
        }
        self.pointer.is_moving = false;
    }

    fn rearm<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.decay.take() {
            host.clear_timeout(id);
        }
        self.decay = Some(host.set_timeout(POINTER_DECAY));
    }
}
