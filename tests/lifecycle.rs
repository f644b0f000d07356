//! Mount/unmount lifecycle, loop cancellation, and event routing driven
//! through a headless host.

use glowfield::accessibility::MotionMode;
use glowfield::backdrop::Backdrop;
use glowfield::canvas::{DrawCommand, RecordingCanvas};
use glowfield::config::BackdropConfig;
use glowfield::host::{HeadlessHost, Host};
use glowfield::particle::MAX_PARTICLES;
use glowfield::simulation::{AGE_RATE, DRAG};
use glowfield::spawn::SpawnRng;
use glowfield::{UVec2, Vec2};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn host(w: f32, h: f32) -> HeadlessHost {
    HeadlessHost::new(Vec2::new(w, h), 1.0)
}

fn backdrop(config: BackdropConfig) -> Backdrop<RecordingCanvas> {
    Backdrop::new(config, Some(RecordingCanvas::new())).with_rng(SpawnRng::seeded(42))
}

fn run_frames(host: &mut HeadlessHost, backdrop: &mut Backdrop<RecordingCanvas>, frames: u32) {
    for _ in 0..frames {
        host.step(backdrop, FRAME);
    }
}

#[test]
fn test_unmount_leaves_host_idle() {
    let mut host = host(1200.0, 800.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    run_frames(&mut host, &mut backdrop, 5);

    // Leave a decay timer pending at unmount time.
    let move_event = host.pointer_move(Vec2::new(100.0, 100.0));
    backdrop.dispatch(&mut host, move_event);
    assert_eq!(host.registry().timer_count(), 1);

    backdrop.unmount(&mut host);
    assert!(host.registry().is_idle());
    assert!(!backdrop.is_running());

    // Events after unmount are not delivered and nothing ticks.
    assert_eq!(host.pointer_move(Vec2::ONE), None);
    assert_eq!(host.resize(Vec2::new(400.0, 400.0)), None);
    let ticks = backdrop.ticks();
    run_frames(&mut host, &mut backdrop, 3);
    assert_eq!(backdrop.ticks(), ticks);

    backdrop.unmount(&mut host);
    assert!(host.registry().is_idle());
}

#[test]
fn test_remount_after_unmount() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    backdrop.unmount(&mut host);
    backdrop.mount(&mut host);
    assert_eq!(host.registry().frame_count(), 1);
    assert_eq!(host.registry().listener_count(), 4);
    run_frames(&mut host, &mut backdrop, 2);
    assert_eq!(backdrop.ticks(), 2);
}

#[test]
fn test_one_tick_per_frame() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    run_frames(&mut host, &mut backdrop, 10);
    assert_eq!(backdrop.ticks(), 10);
    assert_eq!(host.registry().frame_count(), 1);
}

#[test]
fn test_reduced_motion_stops_loop() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    run_frames(&mut host, &mut backdrop, 3);

    let event = host.set_reduced_motion(true);
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.mode(), MotionMode::Static);
    assert!(!backdrop.is_running());
    assert_eq!(host.registry().frame_count(), 0);

    let ticks = backdrop.ticks();
    run_frames(&mut host, &mut backdrop, 5);
    assert_eq!(backdrop.ticks(), ticks);

    let canvas = backdrop.canvas().unwrap();
    let tail = &canvas.commands()[canvas.commands().len() - 2..];
    assert!(matches!(tail[0], DrawCommand::LinearGradient { .. }));
    assert!(matches!(tail[1], DrawCommand::Blur { .. }));

    let event = host.set_reduced_motion(false);
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.mode(), MotionMode::Animated);
    run_frames(&mut host, &mut backdrop, 2);
    assert_eq!(backdrop.ticks(), ticks + 2);
}

#[test]
fn test_reduced_motion_cancels_pending_decay() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    let event = host.pointer_move(Vec2::new(10.0, 10.0));
    backdrop.dispatch(&mut host, event);
    assert!(backdrop.pointer().is_moving);

    let event = host.set_reduced_motion(true);
    backdrop.dispatch(&mut host, event);
    assert!(!backdrop.pointer().is_moving);
    assert_eq!(host.registry().timer_count(), 0);
}

#[test]
fn test_reconfigure_does_not_duplicate_loop() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);

    for i in 0..5 {
        let config = BackdropConfig::new().with_mouse_enabled(i % 2 == 0);
        backdrop.reconfigure(&mut host, config);
        assert_eq!(host.registry().frame_count(), 1);
    }
    run_frames(&mut host, &mut backdrop, 4);
    assert_eq!(backdrop.ticks(), 4);

    // Last config had the mouse enabled: all four listeners.
    assert_eq!(host.registry().listener_count(), 4);

    backdrop.reconfigure(&mut host, BackdropConfig::new().with_mouse_enabled(false));
    assert_eq!(host.registry().listener_count(), 2);
    assert_eq!(host.pointer_move(Vec2::ONE), None);

    backdrop.unmount(&mut host);
    assert!(host.registry().is_idle());
}

#[test]
fn test_resize_reseeds_with_capacity() {
    let mut host = host(1200.0, 800.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    assert_eq!(backdrop.field().len(), 64);

    let event = host.resize(Vec2::new(3840.0, 2160.0));
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.field().len(), MAX_PARTICLES);

    let event = host.resize(Vec2::new(100.0, 100.0));
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.field().len(), 0);

    let event = host.resize(Vec2::new(600.0, 400.0));
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.field().len(), 16);
    assert!(backdrop
        .field()
        .iter()
        .all(|p| (0.0..=600.0).contains(&p.position.x) && (0.0..=400.0).contains(&p.position.y)));

    // Still exactly one loop after resizes.
    assert_eq!(host.registry().frame_count(), 1);
    run_frames(&mut host, &mut backdrop, 1);
    assert_eq!(backdrop.ticks(), 1);
}

#[test]
fn test_dpr_change_rescales_backing() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);

    let event = host.set_device_pixel_ratio(2.0);
    backdrop.dispatch(&mut host, event);
    let descriptor = backdrop.surface().descriptor().copied().unwrap();
    assert_eq!(descriptor.backing, UVec2::new(1600, 1200));
    assert_eq!(descriptor.logical, Vec2::new(800.0, 600.0));
    assert!(backdrop.canvas().unwrap().commands().contains(&DrawCommand::Configure {
        backing: UVec2::new(1600, 1200),
        scale: 2.0,
    }));
    // Field is seeded from the logical size.
    assert_eq!(backdrop.field().len(), 32);
}

#[test]
fn test_touch_without_contact_moves_to_origin() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);

    let event = host.touch_move(Some(Vec2::new(50.0, 60.0)));
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.pointer().position, Vec2::new(50.0, 60.0));

    let event = host.touch_move(None);
    backdrop.dispatch(&mut host, event);
    assert_eq!(backdrop.pointer().position, Vec2::ZERO);
    assert!(backdrop.pointer().is_moving);
}

#[test]
fn test_pointer_decay_after_inactivity() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);

    let event = host.pointer_move(Vec2::new(400.0, 300.0));
    backdrop.dispatch(&mut host, event);
    run_frames(&mut host, &mut backdrop, 6); // 96ms
    assert!(backdrop.pointer().is_moving);
    run_frames(&mut host, &mut backdrop, 1); // 112ms
    assert!(!backdrop.pointer().is_moving);
    assert_eq!(host.registry().timer_count(), 0);
}

#[test]
fn test_no_canvas_skips_ticks() {
    let mut host = host(1200.0, 800.0);
    let mut backdrop: Backdrop<RecordingCanvas> =
        Backdrop::new(BackdropConfig::new(), None).with_rng(SpawnRng::seeded(1));
    backdrop.mount(&mut host);
    let before: Vec<_> = backdrop.field().iter().map(|p| p.position).collect();
    run_frames(&mut host, &mut backdrop, 5);
    let after: Vec<_> = backdrop.field().iter().map(|p| p.position).collect();
    assert_eq!(before, after);

    backdrop.unmount(&mut host);
    assert!(host.registry().is_idle());
}

#[test]
fn test_static_mount_never_schedules() {
    let mut host = host(800.0, 600.0).with_reduced_motion(true);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);
    assert_eq!(host.registry().frame_count(), 0);

    // Resizing in static mode repaints the fallback without starting a loop.
    let event = host.resize(Vec2::new(640.0, 480.0));
    backdrop.dispatch(&mut host, event);
    assert_eq!(host.registry().frame_count(), 0);
    let gradients = backdrop
        .canvas()
        .unwrap()
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::LinearGradient { .. }))
        .count();
    assert_eq!(gradients, 2);
}

#[test]
fn test_frame_cancelled_by_host_is_not_run() {
    let mut host = host(800.0, 600.0);
    let mut backdrop = backdrop(BackdropConfig::new());
    backdrop.mount(&mut host);

    // A frame the backdrop did not request is ignored.
    let foreign = host.request_frame();
    backdrop.handle_event(&mut host, glowfield::HostEvent::Frame(foreign));
    assert_eq!(backdrop.ticks(), 0);
}

/// Mount on a 1200x800 host and pick a particle that will not respawn within
/// the next few ticks, with a pointer target 40px to its right.
fn attraction_setup(config: BackdropConfig) -> (HeadlessHost, Backdrop<RecordingCanvas>, usize, Vec2) {
    let mut host = host(1200.0, 800.0);
    let mut backdrop = backdrop(config);
    backdrop.mount(&mut host);
    let index = backdrop
        .field()
        .iter()
        .position(|p| p.life + 4.0 * AGE_RATE < p.max_life)
        .expect("a long-lived particle");
    let target = backdrop.field().particles()[index].position + Vec2::new(40.0, 0.0);
    (host, backdrop, index, target)
}

/// Velocity change over one frame beyond what drag alone accounts for.
fn extra_velocity(host: &mut HeadlessHost, backdrop: &mut Backdrop<RecordingCanvas>, index: usize) -> f32 {
    let before = backdrop.field().particles()[index];
    host.step(backdrop, FRAME);
    let after = backdrop.field().particles()[index];
    assert!(after.life > before.life, "particle respawned during the frame");
    (after.velocity - before.velocity * DRAG).length()
}

#[test]
fn test_moving_pointer_attracts_nearby_particle() {
    let (mut host, mut backdrop, index, target) = attraction_setup(BackdropConfig::new());
    let event = host.pointer_move(target);
    backdrop.dispatch(&mut host, event);
    assert!(extra_velocity(&mut host, &mut backdrop, index) > 5e-4);
}

#[test]
fn test_no_attraction_without_pointer_move() {
    let (mut host, mut backdrop, index, _) = attraction_setup(BackdropConfig::new());
    assert!(extra_velocity(&mut host, &mut backdrop, index) < 1e-9);
}

#[test]
fn test_no_attraction_with_mouse_disabled() {
    let (mut host, mut backdrop, index, target) =
        attraction_setup(BackdropConfig::new().with_mouse_enabled(false));
    // Delivered directly, since the host has no pointer listener to route it.
    backdrop.handle_event(&mut host, glowfield::HostEvent::PointerMoved(target));
    assert!(extra_velocity(&mut host, &mut backdrop, index) < 1e-9);
}

#[test]
fn test_no_attraction_after_disabling_mid_move() {
    let (mut host, mut backdrop, index, target) = attraction_setup(BackdropConfig::new());
    let event = host.pointer_move(target);
    backdrop.dispatch(&mut host, event);
    backdrop.reconfigure(&mut host, BackdropConfig::new().with_mouse_enabled(false));
    assert!(extra_velocity(&mut host, &mut backdrop, index) < 1e-9);
}

#[test]
fn test_no_attraction_once_pointer_decays() {
    let (mut host, mut backdrop, index, target) = attraction_setup(BackdropConfig::new());
    let event = host.pointer_move(target);
    backdrop.dispatch(&mut host, event);
    host.step(&mut backdrop, Duration::from_millis(120));
    assert!(!backdrop.pointer().is_moving);
    assert!(extra_velocity(&mut host, &mut backdrop, index) < 1e-9);
}
