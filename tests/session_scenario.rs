use std::time::{Duration, Instant};

use approx::assert_abs_diff_eq;
use glam::Vec3;
use scene_studio::{
    backend::{FrameOutcome, FrameView, SceneRenderer},
    config::SessionConfig,
    frame::FrameScheduler,
    scene_graph::EntityKind,
    session::{PlaybackState, SceneSession, SessionEvent},
    viewport::Viewport,
};

/// Stands in for the GPU: remembers what each frame would have drawn.
#[derive(Default)]
struct RecordingRenderer {
    target: Option<Viewport>,
    frames: Vec<RecordedFrame>,
}

struct RecordedFrame {
    entity_count: usize,
    aspect: f32,
    selected: bool,
}

impl SceneRenderer for RecordingRenderer {
    fn resize_target(&mut self, viewport: Viewport) {
        self.target = Some(viewport);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<FrameOutcome> {
        self.frames.push(RecordedFrame {
            entity_count: frame.registry.len(),
            aspect: frame.camera.aspect,
            selected: frame.selected.is_some(),
        });
        Ok(FrameOutcome::Drawn)
    }
}

fn run_for(
    session: &mut SceneSession,
    scheduler: &mut FrameScheduler,
    renderer: &mut RecordingRenderer,
    clock: &mut Instant,
    frames: u32,
    frame_time: Duration,
) {
    for _ in 0..frames {
        *clock += frame_time;
        if let Some(delta) = scheduler.advance(*clock) {
            session.tick(delta, renderer);
        }
    }
}

#[test]
fn create_select_play_stop_scenario() {
    let mut session = SceneSession::new(&SessionConfig::default());
    let mut renderer = RecordingRenderer::default();
    let mut scheduler = FrameScheduler::new();
    let mut clock = Instant::now();

    assert!(session.resize(Viewport::new(1280, 720), &mut renderer));
    assert_eq!(renderer.target, Some(Viewport::new(1280, 720)));

    let cube = session.add_cube();
    let sphere = session.add_sphere();
    let light = session.add_light();

    let order: Vec<_> = session.hierarchy().ids().collect();
    assert_eq!(order, [light, sphere, cube]);
    let labels: Vec<_> = session
        .hierarchy()
        .entries()
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(labels, ["PointLight", "Sphere", "Cube"]);

    assert!(session.select_entity(sphere));
    assert_eq!(session.selection(), Some(sphere));

    scheduler.start(clock);
    session.play();
    run_for(
        &mut session,
        &mut scheduler,
        &mut renderer,
        &mut clock,
        100,
        Duration::from_millis(10),
    );

    for id in [cube, sphere] {
        let rotation = session.entity(id).map(|e| e.transform.rotation()).unwrap_or_default();
        assert_abs_diff_eq!(rotation.y, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(rotation.x, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(rotation.z, 0.0);
    }
    let light_rotation = session.entity(light).map(|e| e.transform.rotation());
    assert_eq!(light_rotation, Some(Vec3::ZERO));

    assert_eq!(renderer.frames.len(), 100);
    let last = renderer.frames.last().expect("frames recorded");
    assert_eq!(last.entity_count, 3);
    assert!(last.selected);
    assert_abs_diff_eq!(last.aspect, 1280.0 / 720.0);

    assert_eq!(session.stop(), PlaybackState::Stopped);
    for (_, entity) in session.registry().iter() {
        assert_eq!(entity.transform.rotation(), Vec3::ZERO);
    }
}

#[test]
fn variable_frame_rate_gives_same_motion_per_second() {
    let mut renderer = RecordingRenderer::default();
    let mut results = Vec::new();

    for (frames, frame_time) in [(30, 33_333u64), (120, 8_333u64), (7, 142_857u64)] {
        let mut session = SceneSession::new(&SessionConfig::default());
        let mut scheduler = FrameScheduler::new();
        let mut clock = Instant::now();
        let cube = session.add_cube();

        scheduler.start(clock);
        session.play();
        run_for(
            &mut session,
            &mut scheduler,
            &mut renderer,
            &mut clock,
            frames,
            Duration::from_micros(frame_time),
        );

        let rotation = session.entity(cube).map(|e| e.transform.rotation()).unwrap_or_default();
        results.push(rotation.y);
    }

    for rotation in results {
        assert_abs_diff_eq!(rotation, 1.0, epsilon = 1e-3);
    }
}

#[test]
fn ui_receives_hierarchy_and_console_updates() {
    let mut session = SceneSession::new(&SessionConfig::default());
    session.populate_starter_scene();

    let events = session.drain_events();
    let hierarchy_sizes: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::HierarchyChanged(view) => Some(view.len()),
            _ => None,
        })
        .collect();
    assert_eq!(hierarchy_sizes, [1, 2, 3]);

    let console: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::Console(message) => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        console,
        ["Cube added", "Sphere added", "Light added", "Starter scene ready."]
    );

    let created: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::EntityCreated { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(created, [EntityKind::Cube, EntityKind::Sphere, EntityKind::Light]);
}

#[test]
fn stopped_scheduler_drives_no_frames() {
    let mut session = SceneSession::new(&SessionConfig::default());
    let mut renderer = RecordingRenderer::default();
    let mut scheduler = FrameScheduler::new();
    let mut clock = Instant::now();
    session.resize(Viewport::new(800, 600), &mut renderer);

    scheduler.start(clock);
    run_for(&mut session, &mut scheduler, &mut renderer, &mut clock, 5, Duration::from_millis(16));
    scheduler.stop();
    run_for(&mut session, &mut scheduler, &mut renderer, &mut clock, 5, Duration::from_millis(16));

    assert_eq!(renderer.frames.len(), 5);
}
