//! The mounted backdrop component.
//!
//! A [`Backdrop`] owns everything one mounted instance needs: the surface and
//! its particle field, pointer tracking, the reduced-motion gate, and the
//! frame loop. It talks to the outside world only through a [`Host`], which
//! delivers [`HostEvent`]s back through [`Backdrop::handle_event`].
//!
//! ```ignore
//! let mut host = HeadlessHost::new(Vec2::new(800.0, 600.0), 1.0);
//! let mut backdrop = Backdrop::new(BackdropConfig::new(), Some(RecordingCanvas::new()));
//! backdrop.mount(&mut host);
//! host.step(&mut backdrop, Duration::from_millis(16));
//! backdrop.unmount(&mut host);
//! assert!(host.registry().is_idle());
//! ```

use crate::accessibility::{AccessibilityGate, MotionMode, MotionTransition};
use crate::canvas::Canvas;
use crate::config::BackdropConfig;
use crate::fallback::StaticFallback;
use crate::host::{EventKind, Host, HostEvent, ListenerId};
use crate::input::{InputAdapter, PointerState};
use crate::particle::ParticleField;
use crate::renderer::Renderer;
use crate::scheduler::FrameScheduler;
use crate::simulation::Simulator;
use crate::spawn::SpawnRng;
use crate::surface::SurfaceController;
use crate::time::FrameClock;

/// A particle backdrop bound to an optional canvas.
///
/// With no canvas the backdrop still mounts, sizes and seeds its field, but
/// every tick is skipped.
#[derive(Debug)]
pub struct Backdrop<C: Canvas> {
    config: BackdropConfig,
    canvas: Option<C>,
    surface: SurfaceController,
    input: InputAdapter,
    gate: AccessibilityGate,
    scheduler: FrameScheduler,
    simulator: Simulator,
    renderer: Renderer,
    rng: SpawnRng,
    clock: FrameClock,
    listeners: Vec<ListenerId>,
    mounted: bool,
}

impl<C: Canvas> Backdrop<C> {
    pub fn new(config: BackdropConfig, canvas: Option<C>) -> Self {
        let config = config.sanitized();
        Self {
            input: InputAdapter::new(config.mouse_enabled),
            simulator: Simulator::new(config.speed),
            config,
            canvas,
            surface: SurfaceController::new(),
            gate: AccessibilityGate::default(),
            scheduler: FrameScheduler::new(),
            renderer: Renderer::new(),
            rng: SpawnRng::default(),
            clock: FrameClock::new(),
            listeners: Vec::new(),
            mounted: false,
        }
    }

    /// Use a specific random source, e.g. a seeded one for reproducible frames.
    pub fn with_rng(mut self, rng: SpawnRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    /// Take the canvas back, consuming the backdrop.
    pub fn into_canvas(self) -> Option<C> {
        self.canvas
    }

    pub fn surface(&self) -> &SurfaceController {
        &self.surface
    }

    pub fn field(&self) -> &ParticleField {
        self.surface.field()
    }

    pub fn pointer(&self) -> PointerState {
        self.input.pointer()
    }

    pub fn mode(&self) -> MotionMode {
        self.gate.mode()
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether a frame is currently scheduled.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Frames ticked since creation.
    pub fn ticks(&self) -> u64 {
        self.scheduler.ticks()
    }

    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }

    /// Attach to `host` and start presenting. Calling it again is a no-op.
    pub fn mount<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.gate = AccessibilityGate::new(host.prefers_reduced_motion());
        self.surface.resize(&*host, self.canvas.as_mut(), &mut self.rng);
        self.attach_listeners(host);

        log::info!(
            "backdrop mounted: {} particles, {:?}, mouse {}",
            self.surface.field().len(),
            self.gate.mode(),
            if self.config.mouse_enabled { "on" } else { "off" }
        );
        self.present(host);
    }

    /// Release everything registered with `host`. Calling it again is a no-op.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.mounted {
            return;
        }
        self.scheduler.stop(host);
        self.input.reset(host);
        self.detach_listeners(host);
        self.mounted = false;
        log::info!("backdrop unmounted after {} frames", self.clock.frames());
    }

    /// Apply a new configuration to a mounted backdrop.
    ///
    /// The loop is stopped before listeners are swapped, so at most one loop
    /// is ever scheduled.
    pub fn reconfigure<H: Host + ?Sized>(&mut self, host: &mut H, config: BackdropConfig) {
        self.config = config.sanitized();
        self.simulator.set_speed(self.config.speed);
        if !self.mounted {
            self.input = InputAdapter::new(self.config.mouse_enabled);
            return;
        }

        self.scheduler.stop(host);
        self.input.set_enabled(host, self.config.mouse_enabled);
        self.detach_listeners(host);
        self.attach_listeners(host);
        log::debug!("backdrop reconfigured: {:?}", self.config);
        self.present(host);
    }

    /// Route a batch of host events.
    pub fn dispatch<H, I>(&mut self, host: &mut H, events: I)
    where
        H: Host + ?Sized,
        I: IntoIterator<Item = HostEvent>,
    {
        for event in events {
            self.handle_event(host, event);
        }
    }

    /// React to one host event. Events arriving while unmounted are ignored.
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: HostEvent) {
        if !self.mounted {
            return;
        }
        match event {
            HostEvent::Resized => {
                self.surface.resize(&*host, self.canvas.as_mut(), &mut self.rng);
                self.scheduler.stop(host);
                self.present(host);
            }
            HostEvent::PointerMoved(position) => self.input.on_pointer_move(host, position),
            HostEvent::TouchMoved(contact) => self.input.on_touch_move(host, contact),
            HostEvent::TimerFired(id) => {
                self.input.on_timer(id);
            }
            HostEvent::MotionPreferenceChanged(reduced) => match self.gate.update(reduced) {
                Some(MotionTransition::ToStatic) => {
                    log::info!("reduced motion requested, showing static backdrop");
                    self.scheduler.stop(host);
                    self.input.reset(host);
                    self.paint_fallback();
                }
                Some(MotionTransition::ToAnimated) => {
                    log::info!("reduced motion cleared, resuming animation");
                    self.clock.reset_window();
                    self.scheduler.start(host);
                }
                None => {}
            },
            HostEvent::Frame(id) => {
                if self.scheduler.accept(id) {
                    self.tick(host);
                    self.scheduler.start(host);
                }
            }
        }
    }

    /// Start the loop or paint the fallback, according to the gate.
    fn present<H: Host + ?Sized>(&mut self, host: &mut H) {
        match self.gate.mode() {
            MotionMode::Animated => {
                self.scheduler.start(host);
            }
            MotionMode::Static => self.paint_fallback(),
        }
    }

    fn paint_fallback(&mut self) {
        let bounds = self.surface.bounds();
        if let Some(canvas) = self.canvas.as_mut() {
            StaticFallback::from_tint(self.config.tint).paint(canvas, bounds);
        }
    }

    /// One animation frame: fade, then simulate and draw each particle in turn.
    fn tick<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        let bounds = self.surface.bounds();
        let pointer = self.input.pointer();
        let attracting =
            self.config.mouse_enabled && self.gate.mode() == MotionMode::Animated && pointer.is_moving;

        self.renderer.fade(canvas, bounds);
        let particles = self.surface.field_mut().particles_mut();
        for index in 0..particles.len() {
            self.simulator
                .step_particle(&mut particles[index], pointer.position, attracting, bounds, &mut self.rng);
            self.renderer.draw_particle(canvas, particles, index, self.config.tint);
        }

        if self.clock.tick(host.now()) {
            log::debug!("{:.1} fps", self.clock.fps());
        }
    }

    fn attach_listeners<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.listeners.push(host.add_listener(EventKind::Resize));
        self.listeners.push(host.add_listener(EventKind::MotionPreference));
        if self.config.mouse_enabled {
            self.listeners.push(host.add_listener(EventKind::PointerMove));
            self.listeners.push(host.add_listener(EventKind::TouchMove));
        }
    }

    fn detach_listeners<H: Host + ?Sized>(&mut self, host: &mut H) {
        for id in self.listeners.drain(..) {
            host.remove_listener(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::host::HeadlessHost;
    use glam::Vec2;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    fn setup(config: BackdropConfig) -> (HeadlessHost, Backdrop<RecordingCanvas>) {
        let host = HeadlessHost::new(Vec2::new(1200.0, 800.0), 1.0);
        let backdrop =
            Backdrop::new(config, Some(RecordingCanvas::new())).with_rng(SpawnRng::seeded(11));
        (host, backdrop)
    }

    #[test]
    fn test_mount_registers_listeners_and_frame() {
        let (mut host, mut backdrop) = setup(BackdropConfig::new());
        backdrop.mount(&mut host);
        assert_eq!(host.registry().listener_count(), 4);
        assert_eq!(host.registry().frame_count(), 1);
        assert_eq!(backdrop.field().len(), 64);
        assert_eq!(backdrop.mode(), MotionMode::Animated);

        backdrop.mount(&mut host);
        assert_eq!(host.registry().listener_count(), 4);
    }

    #[test]
    fn test_mouse_disabled_skips_pointer_listeners() {
        let (mut host, mut backdrop) = setup(BackdropConfig::new().with_mouse_enabled(false));
        backdrop.mount(&mut host);
        assert_eq!(host.registry().listener_count(), 2);
        assert_eq!(host.pointer_move(Vec2::ONE), None);
    }

    #[test]
    fn test_frame_draws_fade_then_particles() {
        let (mut host, mut backdrop) = setup(BackdropConfig::new());
        backdrop.mount(&mut host);
        host.step(&mut backdrop, FRAME);

        let canvas = backdrop.canvas().unwrap();
        // Configure, then the fade for the first frame.
        assert!(matches!(canvas.commands()[0], DrawCommand::Configure { .. }));
        assert!(matches!(canvas.commands()[1], DrawCommand::FillRect { .. }));
        assert_eq!(canvas.glow_count(), 64);
        assert_eq!(backdrop.ticks(), 1);
        assert!(backdrop.is_running());
    }

    #[test]
    fn test_static_mount_paints_fallback() {
        let (host, mut backdrop) = setup(BackdropConfig::new());
        let mut host = host.with_reduced_motion(true);
        backdrop.mount(&mut host);
        assert_eq!(backdrop.mode(), MotionMode::Static);
        assert!(!backdrop.is_running());
        assert_eq!(host.registry().frame_count(), 0);
        let canvas = backdrop.canvas().unwrap();
        assert!(canvas
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::LinearGradient { .. })));
        assert_eq!(canvas.glow_count(), 0);
    }

    #[test]
    fn test_pointer_attracts_while_moving() {
        let (mut host, mut backdrop) = setup(BackdropConfig::new());
        backdrop.mount(&mut host);
        let events: Vec<_> = host.pointer_move(Vec2::new(600.0, 400.0)).into_iter().collect();
        backdrop.dispatch(&mut host, events);
        assert!(backdrop.pointer().is_moving);

        host.step(&mut backdrop, Duration::from_millis(100));
        assert!(!backdrop.pointer().is_moving);
    }

    #[test]
    fn test_events_ignored_when_unmounted() {
        let (mut host, mut backdrop) = setup(BackdropConfig::new());
        backdrop.handle_event(&mut host, HostEvent::PointerMoved(Vec2::ONE));
        backdrop.handle_event(&mut host, HostEvent::Resized);
        assert!(!backdrop.pointer().is_moving);
        assert_eq!(backdrop.surface().resizes(), 0);
        assert!(host.registry().is_idle());
    }

    #[test]
    fn test_reconfigure_applies_speed() {
        let (mut host, mut backdrop) = setup(BackdropConfig::new());
        backdrop.mount(&mut host);
        backdrop.reconfigure(&mut host, BackdropConfig::new().with_speed(-3.0));
        assert_eq!(backdrop.config().speed, 1.0);
        backdrop.reconfigure(&mut host, BackdropConfig::new().with_speed(2.5));
        assert_eq!(backdrop.config().speed, 2.5);
        assert_eq!(host.registry().frame_count(), 1);
    }
}
