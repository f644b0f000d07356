//! Platform capability interface.
//!
//! A backdrop never queries the platform directly. Ambient signals (pixel
//! ratio, viewport, reduced-motion preference, clock) come through
//! [`Platform`], and everything it registers (listeners, timeouts, frame
//! requests) goes through [`Host`] so that teardown can be verified.
//!
//! The host delivers [`HostEvent`]s back to the backdrop on the same thread.
//! [`HeadlessHost`] is a deterministic implementation with a virtual clock,
//! used by tests and snapshots; the window shell has its own.

use crate::backdrop::Backdrop;
use crate::canvas::Canvas;
use glam::Vec2;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

/// Handle for a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Handle for a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Handle for a pending display-synchronised frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

/// Kinds of platform events a backdrop can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    PointerMove,
    TouchMove,
    MotionPreference,
}

/// An event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Viewport size or pixel ratio changed; re-read them from the platform.
    Resized,
    /// Pointer moved to a logical position.
    PointerMoved(Vec2),
    /// Touch moved; `None` when the event carries no active contact point.
    TouchMoved(Option<Vec2>),
    /// The reduced-motion preference changed to the given value.
    MotionPreferenceChanged(bool),
    /// A timeout set through [`Host::set_timeout`] elapsed.
    TimerFired(TimerId),
    /// A frame requested through [`Host::request_frame`] is due.
    Frame(FrameId),
}

impl HostEvent {
    /// Listener kind that must be registered for this event to be delivered.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            HostEvent::Resized => Some(EventKind::Resize),
            HostEvent::PointerMoved(_) => Some(EventKind::PointerMove),
            HostEvent::TouchMoved(_) => Some(EventKind::TouchMove),
            HostEvent::MotionPreferenceChanged(_) => Some(EventKind::MotionPreference),
            HostEvent::TimerFired(_) | HostEvent::Frame(_) => None,
        }
    }
}

/// Read-only ambient platform signals.
pub trait Platform {
    /// Device pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f32;
    /// Logical viewport size.
    fn viewport_size(&self) -> Vec2;
    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;
    /// Monotonic time since the host started.
    fn now(&self) -> Duration;
}

/// Registration side of the host. Every `add`/`set`/`request` has a matching
/// `remove`/`clear`/`cancel`.
pub trait Host: Platform {
    fn add_listener(&mut self, kind: EventKind) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
    fn set_timeout(&mut self, delay: Duration) -> TimerId;
    fn clear_timeout(&mut self, id: TimerId);
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Bookkeeping for listeners, timeouts, and frame requests.
///
/// Shared by every host implementation; the counts make leaks observable.
#[derive(Debug, Default)]
pub struct Registry {
    next_id: u64,
    listeners: HashMap<ListenerId, EventKind>,
    timers: BTreeMap<TimerId, Duration>,
    frames: BTreeSet<FrameId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id, kind);
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Whether any listener of `kind` is registered.
    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Register a timeout firing at `deadline`.
    pub fn set_timeout(&mut self, deadline: Duration) -> TimerId {
        let id = TimerId(self.next());
        self.timers.insert(id, deadline);
        id
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next());
        self.frames.insert(id);
        id
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        self.frames.remove(&id)
    }

    /// Remove and return every pending frame request, oldest first.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    /// Remove and return timeouts due at `now`, earliest deadline first.
    pub fn take_due_timers(&mut self, now: Duration) -> Vec<TimerId> {
        let mut due: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().min().copied()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Nothing registered and nothing pending.
    pub fn is_idle(&self) -> bool {
        self.listeners.is_empty() && self.timers.is_empty() && self.frames.is_empty()
    }
}

/// Deterministic host with injected platform values and a virtual clock.
#[derive(Debug)]
pub struct HeadlessHost {
    viewport: Vec2,
    device_pixel_ratio: f32,
    reduced_motion: bool,
    now: Duration,
    registry: Registry,
}

impl HeadlessHost {
    pub fn new(viewport: Vec2, device_pixel_ratio: f32) -> Self {
        Self {
            viewport,
            device_pixel_ratio,
            reduced_motion: false,
            now: Duration::ZERO,
            registry: Registry::new(),
        }
    }

    /// Set the initial reduced-motion preference without emitting an event.
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Emit `event` only if something listens for its kind.
    fn deliver(&self, event: HostEvent) -> Option<HostEvent> {
        match event.kind() {
            Some(kind) if !self.registry.has_listener(kind) => None,
            _ => Some(event),
        }
    }

    /// Change the viewport.
    pub fn resize(&mut self, viewport: Vec2) -> Option<HostEvent> {
        self.viewport = viewport;
        self.deliver(HostEvent::Resized)
    }

    /// Change the pixel ratio (e.g. moving to another monitor).
    pub fn set_device_pixel_ratio(&mut self, dpr: f32) -> Option<HostEvent> {
        self.device_pixel_ratio = dpr;
        self.deliver(HostEvent::Resized)
    }

    pub fn pointer_move(&mut self, position: Vec2) -> Option<HostEvent> {
        self.deliver(HostEvent::PointerMoved(position))
    }

    pub fn touch_move(&mut self, contact: Option<Vec2>) -> Option<HostEvent> {
        self.deliver(HostEvent::TouchMoved(contact))
    }

    /// Flip the reduced-motion preference; emits only on an actual change.
    pub fn set_reduced_motion(&mut self, reduced: bool) -> Option<HostEvent> {
        if self.reduced_motion == reduced {
            return None;
        }
        self.reduced_motion = reduced;
        self.deliver(HostEvent::MotionPreferenceChanged(reduced))
    }

    /// Move the virtual clock forward and collect timeouts that came due.
    pub fn advance(&mut self, dt: Duration) -> Vec<HostEvent> {
        self.now += dt;
        self.registry
            .take_due_timers(self.now)
            .into_iter()
            .map(HostEvent::TimerFired)
            .collect()
    }

    /// Collect this display frame's pending frame callbacks.
    pub fn animation_frame(&mut self) -> Vec<HostEvent> {
        self.registry
            .take_frames()
            .into_iter()
            .map(HostEvent::Frame)
            .collect()
    }

    /// Advance by `dt`, deliver due timeouts, then deliver the frame.
    pub fn step<C: Canvas>(&mut self, backdrop: &mut Backdrop<C>, dt: Duration) {
        let timers = self.advance(dt);
        backdrop.dispatch(self, timers);
        let frames = self.animation_frame();
        backdrop.dispatch(self, frames);
    }
}

impl Platform for HeadlessHost {
    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn now(&self) -> Duration {
        self.now
    }
}

impl Host for HeadlessHost {
    fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        self.registry.add_listener(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.registry.remove_listener(id);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.registry.set_timeout(self.now + delay)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.registry.clear_timeout(id);
    }

    fn request_frame(&mut self) -> FrameId {
        self.registry.request_frame()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.registry.cancel_frame(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_counts() {
        let mut registry = Registry::new();
        assert!(registry.is_idle());

        let l = registry.add_listener(EventKind::Resize);
        let t = registry.set_timeout(Duration::from_millis(100));
        let f = registry.request_frame();
        assert_eq!(registry.listener_count(), 1);
        assert_eq!(registry.timer_count(), 1);
        assert_eq!(registry.frame_count(), 1);
        assert!(registry.has_listener(EventKind::Resize));
        assert!(!registry.has_listener(EventKind::PointerMove));

        assert!(registry.remove_listener(l));
        assert!(registry.clear_timeout(t));
        assert!(registry.cancel_frame(f));
        assert!(!registry.cancel_frame(f));
        assert!(registry.is_idle());
    }

    #[test]
    fn test_due_timers_in_deadline_order() {
        let mut registry = Registry::new();
        let late = registry.set_timeout(Duration::from_millis(200));
        let early = registry.set_timeout(Duration::from_millis(50));
        let _future = registry.set_timeout(Duration::from_millis(900));

        assert_eq!(registry.next_deadline(), Some(Duration::from_millis(50)));
        let due = registry.take_due_timers(Duration::from_millis(250));
        assert_eq!(due, vec![early, late]);
        assert_eq!(registry.timer_count(), 1);
    }

    #[test]
    fn test_headless_delivers_only_to_listeners() {
        let mut host = HeadlessHost::new(Vec2::new(800.0, 600.0), 1.0);
        assert_eq!(host.pointer_move(Vec2::ONE), None);

        let id = host.add_listener(EventKind::PointerMove);
        assert_eq!(host.pointer_move(Vec2::ONE), Some(HostEvent::PointerMoved(Vec2::ONE)));

        host.remove_listener(id);
        assert_eq!(host.pointer_move(Vec2::ONE), None);
    }

    #[test]
    fn test_headless_timeouts_use_virtual_clock() {
        let mut host = HeadlessHost::new(Vec2::new(800.0, 600.0), 1.0);
        let id = host.set_timeout(Duration::from_millis(100));
        assert!(host.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(host.advance(Duration::from_millis(1)), vec![HostEvent::TimerFired(id)]);
        assert_eq!(host.now(), Duration::from_millis(100));
    }

    #[test]
    fn test_reduced_motion_emits_on_change_only() {
        let mut host = HeadlessHost::new(Vec2::new(800.0, 600.0), 1.0);
        host.add_listener(EventKind::MotionPreference);
        assert_eq!(host.set_reduced_motion(false), None);
        assert_eq!(
            host.set_reduced_motion(true),
            Some(HostEvent::MotionPreferenceChanged(true))
        );
        assert!(host.prefers_reduced_motion());
    }
}
