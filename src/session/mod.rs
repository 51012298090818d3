pub mod events;
pub mod hierarchy;
pub mod playback;
pub mod selection;

use std::time::Duration;

use glam::Vec3;

pub use events::{EventQueue, SessionEvent};
pub use hierarchy::{HierarchyEntry, HierarchyView};
pub use playback::{PlaybackCommand, PlaybackMachine, PlaybackState, Transition};
pub use selection::Selection;

use crate::{
    backend::{FrameOutcome, FrameView, SceneRenderer},
    camera::{Camera, OrbitControls},
    config::{AnimationConfig, SessionConfig},
    frame::FpsCounter,
    scene_graph::{Entity, EntityId, EntityKind, EntityRegistry},
    viewport::Viewport,
};

/// Commands the UI layer can bind to its widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    AddEntity(EntityKind),
    Play,
    Pause,
    Stop,
    Select(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub animated: bool,
    pub rendered: bool,
    pub camera_moving: bool,
    pub fps: Option<f32>,
}

/// One editing session: the entity registry plus selection, playback, camera and
/// frame statistics. All mutation happens through `&mut self` on the host thread,
/// so commands are fully applied before the next `tick` observes them.
pub struct SceneSession {
    animation: AnimationConfig,
    registry: EntityRegistry,
    selection: Selection,
    playback: PlaybackMachine,
    hierarchy: HierarchyView,
    camera: Camera,
    controls: OrbitControls,
    viewport: Option<Viewport>,
    fps: FpsCounter,
    events: EventQueue,
}

impl SceneSession {
    pub fn new(config: &SessionConfig) -> Self {
        let camera = Camera::from_config(&config.camera);
        let controls = OrbitControls::new(&camera, &config.camera);

        Self {
            animation: config.animation.clone(),
            registry: EntityRegistry::new(&config.placement),
            selection: Selection::new(),
            playback: PlaybackMachine::new(),
            hierarchy: HierarchyView::default(),
            camera,
            controls,
            viewport: None,
            fps: FpsCounter::new(config.fps_report_interval()),
            events: EventQueue::default(),
        }
    }

    pub fn populate_starter_scene(&mut self) {
        self.add_cube();
        self.add_sphere();
        self.add_light();
        self.console("Starter scene ready.".to_string());
    }

    pub fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::AddEntity(kind) => {
                self.add_entity(kind);
            }
            SessionCommand::Play => {
                self.play();
            }
            SessionCommand::Pause => {
                self.pause();
            }
            SessionCommand::Stop => {
                self.stop();
            }
            SessionCommand::Select(id) => {
                self.select_entity(id);
            }
        }
    }

    pub fn add_entity(&mut self, kind: EntityKind) -> EntityId {
        let id = self.registry.create(kind);
        log::info!("{} added", kind.label());

        self.events.push(SessionEvent::EntityCreated { id, kind });
        self.refresh_hierarchy();
        self.console(format!("{} added", kind.label()));
        id
    }

    pub fn add_cube(&mut self) -> EntityId {
        self.add_entity(EntityKind::Cube)
    }

    pub fn add_sphere(&mut self) -> EntityId {
        self.add_entity(EntityKind::Sphere)
    }

    pub fn add_light(&mut self) -> EntityId {
        self.add_entity(EntityKind::Light)
    }

    /// Selects `id`. Unknown ids and re-selecting the current entity do nothing.
    pub fn select_entity(&mut self, id: EntityId) -> bool {
        if !self.selection.select(id, &self.registry) {
            return false;
        }

        let name = self
            .registry
            .get(id)
            .map(|entity| entity.name.clone())
            .unwrap_or_default();
        log::info!("Selected {name}");

        self.events.push(SessionEvent::SelectionChanged(Some(id)));
        self.refresh_hierarchy();
        self.console(format!("Selected {name}"));
        true
    }

    pub fn play(&mut self) -> PlaybackState {
        self.transition(PlaybackCommand::Play)
    }

    pub fn pause(&mut self) -> PlaybackState {
        self.transition(PlaybackCommand::Pause)
    }

    pub fn stop(&mut self) -> PlaybackState {
        self.transition(PlaybackCommand::Stop)
    }

    fn transition(&mut self, command: PlaybackCommand) -> PlaybackState {
        let transition = self.playback.apply(command);

        if transition.resets_animation() {
            self.reset_animation();
        }

        if transition.changed() {
            log::info!("Playback {} -> {}", transition.from, transition.to);
            self.events.push(SessionEvent::PlaybackChanged(transition.to));
            self.console(command.label().to_string());
        } else {
            log::debug!("{} ignored while {}", command.label(), transition.from);
        }

        transition.to
    }

    fn reset_animation(&mut self) {
        for (_, entity) in self.registry.iter_mut() {
            entity.transform.reset_rotation();
        }
    }

    /// Runs one frame: animation (while playing), camera damping, render, fps sampling.
    pub fn tick<R>(&mut self, delta: Duration, renderer: &mut R) -> TickReport
    where
        R: SceneRenderer + ?Sized,
    {
        let mut report = TickReport::default();

        if self.playback.state().is_playing() {
            self.animate(delta);
            report.animated = true;
        }

        report.camera_moving = self.controls.update(&mut self.camera);

        match self.viewport.filter(|viewport| !viewport.is_degenerate()) {
            Some(viewport) => {
                let frame = FrameView {
                    registry: &self.registry,
                    camera: &self.camera,
                    selected: self.selection.current(),
                    viewport,
                };

                match renderer.render(&frame) {
                    Ok(FrameOutcome::Drawn) => report.rendered = true,
                    Ok(FrameOutcome::Skipped) => log::trace!("Renderer skipped the frame"),
                    Err(err) => log::warn!("Frame render failed: {err:?}"),
                }
            }
            None => log::trace!("Skipping render without a drawable surface"),
        }

        if let Some(fps) = self.fps.record(delta) {
            self.events.push(SessionEvent::FpsSampled(fps));
            report.fps = Some(fps);
        }

        report
    }

    fn animate(&mut self, delta: Duration) {
        let seconds = delta.as_secs_f32();
        let step = Vec3::new(
            seconds * self.animation.spin_rate_x,
            seconds * self.animation.spin_rate_y,
            0.0,
        );

        for (_, entity) in self.registry.iter_mut() {
            if entity.kind.is_animated() {
                entity.transform.rotate(step);
            }
        }
    }

    /// Matches camera aspect and render target to a new surface size. A zero-sized
    /// surface keeps the aspect and render target but stops rendering until the
    /// next non-empty resize. Returns `true` when the resize was applied.
    pub fn resize<R>(&mut self, viewport: Viewport, renderer: &mut R) -> bool
    where
        R: SceneRenderer + ?Sized,
    {
        let Some(aspect) = viewport.aspect_ratio() else {
            log::debug!("Surface hidden at {}x{}", viewport.width, viewport.height);
            self.viewport = Some(viewport);
            return false;
        };

        self.camera.aspect = aspect;
        renderer.resize_target(viewport);
        self.viewport = Some(viewport);
        log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        true
    }

    fn refresh_hierarchy(&mut self) {
        self.selection.prune(&self.registry);
        self.hierarchy = HierarchyView::project(&self.registry, &self.selection);
        debug_assert_eq!(self.hierarchy.len(), self.registry.len());
        self.events
            .push(SessionEvent::HierarchyChanged(self.hierarchy.clone()));
    }

    fn console(&mut self, message: String) {
        self.events.push(SessionEvent::Console(message));
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn selection(&self) -> Option<EntityId> {
        self.selection.current()
    }

    pub fn selected_entity(&self) -> Option<(EntityId, &Entity)> {
        let id = self.selection.current()?;
        self.registry.get(id).map(|entity| (id, entity))
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn hierarchy(&self) -> &HierarchyView {
        &self.hierarchy
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
        resizes: Vec<Viewport>,
        fail: bool,
        skip: bool,
    }

    impl SceneRenderer for CountingRenderer {
        fn resize_target(&mut self, viewport: Viewport) {
            self.resizes.push(viewport);
        }

        fn render(&mut self, _frame: &FrameView<'_>) -> anyhow::Result<FrameOutcome> {
            if self.fail {
                anyhow::bail!("surface lost");
            }
            if self.skip {
                return Ok(FrameOutcome::Skipped);
            }
            self.frames += 1;
            Ok(FrameOutcome::Drawn)
        }
    }

    fn session() -> SceneSession {
        SceneSession::new(&SessionConfig::default())
    }

    fn rotations(session: &SceneSession) -> Vec<Vec3> {
        session
            .registry()
            .iter()
            .map(|(_, entity)| entity.transform.rotation())
            .collect()
    }

    #[test]
    fn stop_resets_rotation_from_every_state() {
        for pause_first in [false, true] {
            let mut session = session();
            let mut renderer = CountingRenderer::default();
            session.populate_starter_scene();

            session.play();
            session.tick(Duration::from_millis(300), &mut renderer);
            if pause_first {
                session.pause();
            }
            assert!(rotations(&session).iter().any(|r| *r != Vec3::ZERO));

            assert_eq!(session.stop(), PlaybackState::Stopped);
            assert!(rotations(&session).iter().all(|r| *r == Vec3::ZERO));
        }
    }

    #[test]
    fn split_ticks_match_single_tick() {
        let mut renderer = CountingRenderer::default();

        let mut split = session();
        let split_cube = split.add_cube();
        split.play();
        split.tick(Duration::from_millis(10), &mut renderer);
        split.tick(Duration::from_millis(10), &mut renderer);

        let mut single = session();
        let single_cube = single.add_cube();
        single.play();
        single.tick(Duration::from_millis(20), &mut renderer);

        let a = split.entity(split_cube).map(|e| e.transform.rotation()).unwrap_or_default();
        let b = single.entity(single_cube).map(|e| e.transform.rotation()).unwrap_or_default();
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-6);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-6);
    }

    #[test]
    fn ticks_outside_playing_never_rotate() {
        let mut session = session();
        let mut renderer = CountingRenderer::default();
        session.populate_starter_scene();

        for _ in 0..100 {
            session.tick(Duration::from_millis(16), &mut renderer);
        }
        assert!(rotations(&session).iter().all(|r| *r == Vec3::ZERO));

        session.play();
        session.tick(Duration::from_millis(16), &mut renderer);
        session.pause();
        let paused = rotations(&session);
        for _ in 0..100 {
            let report = session.tick(Duration::from_millis(16), &mut renderer);
            assert!(!report.animated);
        }
        assert_eq!(rotations(&session), paused);
    }

    #[test]
    fn render_skipped_until_surface_has_area() {
        let mut session = session();
        let mut renderer = CountingRenderer::default();

        assert!(!session.tick(Duration::from_millis(16), &mut renderer).rendered);
        assert!(!session.resize(Viewport::new(640, 0), &mut renderer));
        assert!(!session.tick(Duration::from_millis(16), &mut renderer).rendered);
        assert_eq!(renderer.frames, 0);

        assert!(session.resize(Viewport::new(640, 480), &mut renderer));
        assert!(session.tick(Duration::from_millis(16), &mut renderer).rendered);
        assert_eq!(renderer.frames, 1);
    }

    #[test]
    fn zero_height_resize_keeps_aspect() {
        let mut session = session();
        let mut renderer = CountingRenderer::default();

        session.resize(Viewport::new(1600, 900), &mut renderer);
        let aspect = session.camera().aspect;

        assert!(!session.resize(Viewport::new(1600, 0), &mut renderer));
        assert_eq!(session.camera().aspect, aspect);
        assert_eq!(renderer.resizes, [Viewport::new(1600, 900)]);
    }

    #[test]
    fn minimized_surface_stops_rendering_until_restored() {
        let mut session = session();
        let mut renderer = CountingRenderer::default();

        assert!(session.resize(Viewport::new(640, 480), &mut renderer));
        assert!(session.tick(Duration::from_millis(16), &mut renderer).rendered);
        let aspect = session.camera().aspect;

        assert!(!session.resize(Viewport::new(0, 0), &mut renderer));
        let report = session.tick(Duration::from_millis(16), &mut renderer);
        assert!(!report.rendered);
        assert_eq!(session.camera().aspect, aspect);
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.resizes, [Viewport::new(640, 480)]);

        assert!(session.resize(Viewport::new(640, 480), &mut renderer));
        assert!(session.tick(Duration::from_millis(16), &mut renderer).rendered);
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn skipped_frames_are_not_reported_as_rendered() {
        let mut session = session();
        let mut renderer = CountingRenderer {
            skip: true,
            ..Default::default()
        };
        session.resize(Viewport::new(320, 240), &mut renderer);

        assert!(!session.tick(Duration::from_millis(16), &mut renderer).rendered);
        assert_eq!(renderer.frames, 0);

        renderer.skip = false;
        assert!(session.tick(Duration::from_millis(16), &mut renderer).rendered);
    }

    #[test]
    fn render_errors_do_not_stop_the_loop() {
        let mut session = session();
        let mut renderer = CountingRenderer {
            fail: true,
            ..Default::default()
        };
        session.resize(Viewport::new(320, 240), &mut renderer);
        session.add_cube();
        session.play();

        let report = session.tick(Duration::from_millis(16), &mut renderer);
        assert!(!report.rendered);
        assert!(report.animated);
    }

    #[test]
    fn fps_sample_emitted_on_interval() {
        let mut session = session();
        let mut renderer = CountingRenderer::default();
        session.drain_events();

        let mut samples = Vec::new();
        for _ in 0..60 {
            if let Some(fps) = session.tick(Duration::from_millis(10), &mut renderer).fps {
                samples.push(fps);
            }
        }

        assert_eq!(samples, [100.0]);
        assert!(session
            .drain_events()
            .iter()
            .any(|event| *event == SessionEvent::FpsSampled(100.0)));
    }

    #[test]
    fn redundant_transitions_emit_nothing() {
        let mut session = session();
        session.drain_events();

        session.pause();
        session.stop();
        assert!(session.drain_events().is_empty());

        session.play();
        session.play();
        let events = session.drain_events();
        assert_eq!(
            events,
            [
                SessionEvent::PlaybackChanged(PlaybackState::Playing),
                SessionEvent::Console("Play".to_string()),
            ]
        );
    }

    #[test]
    fn commands_route_to_operations() {
        let mut session = session();
        session.apply(SessionCommand::AddEntity(EntityKind::Sphere));
        let sphere = session.hierarchy().entries()[0].id;

        session.apply(SessionCommand::Select(sphere));
        session.apply(SessionCommand::Play);

        assert_eq!(session.selection(), Some(sphere));
        assert_eq!(session.playback_state(), PlaybackState::Playing);
        assert_eq!(
            session.selected_entity().map(|(_, e)| e.kind),
            Some(EntityKind::Sphere)
        );
    }

    #[test]
    fn selection_change_republishes_hierarchy() {
        let mut session = session();
        let cube = session.add_cube();
        let sphere = session.add_sphere();
        session.drain_events();

        assert!(session.select_entity(cube));
        assert!(session.select_entity(sphere));

        let events = session.drain_events();
        let last_view = events
            .iter()
            .rev()
            .find_map(|event| match event {
                SessionEvent::HierarchyChanged(view) => Some(view.clone()),
                _ => None,
            })
            .expect("hierarchy published");

        assert_eq!(last_view.selected().map(|entry| entry.id), Some(sphere));
        assert!(events.contains(&SessionEvent::Console("Selected Sphere".to_string())));
    }
}
