//! Native window shell.
//!
//! [`WinitHost`] implements [`Host`] on top of a winit window: listeners and
//! timeouts live in a [`Registry`], frame requests turn into redraw requests,
//! and timeouts fire from `about_to_wait`. Each redraw runs the pending frame
//! and presents the rasterised canvas through [`Presenter`].
//!
//! Keys: `R` toggles the reduced-motion preference, `M` toggles pointer
//! attraction, `Esc` quits.

use crate::backdrop::Backdrop;
use crate::config::BackdropConfig;
use crate::error::AppError;
use crate::gpu::Presenter;
use crate::host::{EventKind, FrameId, Host, HostEvent, ListenerId, Platform, Registry, TimerId};
use crate::raster::PixelCanvas;
use glam::Vec2;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

const TITLE: &str = "glowfield";

/// Only touch movement drives the pointer; touch start and end do not.
fn forwards_touch(phase: TouchPhase) -> bool {
    phase == TouchPhase::Moved
}

/// [`Host`] backed by a winit window.
pub struct WinitHost {
    window: Arc<Window>,
    start: Instant,
    registry: Registry,
    reduced_motion: bool,
}

impl WinitHost {
    pub fn new(window: Arc<Window>, reduced_motion: bool) -> Self {
        Self {
            window,
            start: Instant::now(),
            registry: Registry::new(),
            reduced_motion,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether `event` has a registered listener (timers and frames always do).
    fn wants(&self, event: &HostEvent) -> bool {
        event.kind().map_or(true, |kind| self.registry.has_listener(kind))
    }

    /// Wall-clock instant of the earliest pending timeout.
    fn next_wakeup(&self) -> Option<Instant> {
        self.registry.next_deadline().map(|deadline| self.start + deadline)
    }

    fn to_logical(&self, x: f64, y: f64) -> Vec2 {
        let scale = self.window.scale_factor();
        Vec2::new((x / scale) as f32, (y / scale) as f32)
    }
}

impl Platform for WinitHost {
    fn device_pixel_ratio(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    fn viewport_size(&self) -> Vec2 {
        let size = self.window.inner_size().to_logical::<f32>(self.window.scale_factor());
        Vec2::new(size.width, size.height)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Host for WinitHost {
    fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        self.registry.add_listener(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.registry.remove_listener(id);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let deadline = self.now() + delay;
        self.registry.set_timeout(deadline)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.registry.clear_timeout(id);
    }

    fn request_frame(&mut self) -> FrameId {
        self.window.request_redraw();
        self.registry.request_frame()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.registry.cancel_frame(id);
    }
}

/// Everything that exists once the window is up.
struct Running {
    host: WinitHost,
    backdrop: Backdrop<PixelCanvas>,
    presenter: Presenter,
    shown_fps: u32,
}

impl Running {
    /// Deliver `event` if something listens for it, then schedule a repaint so
    /// static frames get presented too.
    fn deliver(&mut self, event: HostEvent) {
        if self.host.wants(&event) {
            self.backdrop.handle_event(&mut self.host, event);
            self.host.window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let frames: Vec<HostEvent> = self
            .host
            .registry
            .take_frames()
            .into_iter()
            .map(HostEvent::Frame)
            .collect();
        self.backdrop.dispatch(&mut self.host, frames);

        let presented = match self.backdrop.canvas() {
            Some(canvas) => self.presenter.present(canvas.width(), canvas.height(), canvas.pixels()),
            None => Ok(()),
        };
        match presented {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.backdrop.unmount(&mut self.host);
                event_loop.exit();
            }
            Err(e) => log::warn!("present failed: {:?}", e),
        }

        let fps = self.backdrop.fps().round() as u32;
        if fps != self.shown_fps {
            self.shown_fps = fps;
            self.host
                .window
                .set_title(&format!("{} - {} fps - {:?}", TITLE, fps, self.backdrop.mode()));
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: &Key) {
        match key {
            Key::Named(NamedKey::Escape) => {
                self.backdrop.unmount(&mut self.host);
                event_loop.exit();
            }
            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                self.host.reduced_motion = !self.host.reduced_motion;
                log::info!("reduced motion preference: {}", self.host.reduced_motion);
                self.deliver(HostEvent::MotionPreferenceChanged(self.host.reduced_motion));
            }
            Key::Character(c) if c.eq_ignore_ascii_case("m") => {
                let config = self.backdrop.config().clone();
                let enabled = !config.mouse_enabled;
                log::info!("mouse interaction: {}", if enabled { "on" } else { "off" });
                self.backdrop
                    .reconfigure(&mut self.host, config.with_mouse_enabled(enabled));
                self.host.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// winit application driving one backdrop.
pub struct App {
    config: BackdropConfig,
    reduced_motion: bool,
    running: Option<Running>,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: BackdropConfig, reduced_motion: bool) -> Self {
        Self {
            config,
            reduced_motion,
            running: None,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running, AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let presenter = Presenter::new(window.clone())?;

        let mut host = WinitHost::new(window, self.reduced_motion);
        let mut backdrop = Backdrop::new(self.config.clone(), Some(PixelCanvas::new(0, 0)));
        backdrop.mount(&mut host);
        host.window.request_redraw();

        Ok(Running {
            host,
            backdrop,
            presenter,
            shown_fps: 0,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                running.backdrop.unmount(&mut running.host);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.presenter.resize(size.width, size.height);
                running.deliver(HostEvent::Resized);
            }
            WindowEvent::ScaleFactorChanged { .. } => running.deliver(HostEvent::Resized),
            WindowEvent::CursorMoved { position, .. } => {
                let position = running.host.to_logical(position.x, position.y);
                running.deliver(HostEvent::PointerMoved(position));
            }
            WindowEvent::Touch(touch) => {
                if forwards_touch(touch.phase) {
                    let position = running.host.to_logical(touch.location.x, touch.location.y);
                    running.deliver(HostEvent::TouchMoved(Some(position)));
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => running.on_key(event_loop, &logical_key),
            WindowEvent::RedrawRequested => running.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        let now = running.host.now();
        let due: Vec<HostEvent> = running
            .host
            .registry
            .take_due_timers(now)
            .into_iter()
            .map(HostEvent::TimerFired)
            .collect();
        running.backdrop.dispatch(&mut running.host, due);

        match running.host.next_wakeup() {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

/// Open a window and run the backdrop until it is closed.
pub fn run(config: BackdropConfig, reduced_motion: bool) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, reduced_motion);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
