use crate::{
    camera::Camera,
    scene_graph::{EntityId, EntityRegistry},
    viewport::Viewport,
};

/// Everything a renderer needs to draw one frame.
pub struct FrameView<'a> {
    pub registry: &'a EntityRegistry,
    pub camera: &'a Camera,
    pub selected: Option<EntityId>,
    pub viewport: Viewport,
}

/// What a renderer did with one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// No surface texture was available (lost, outdated or timed out).
    Skipped,
}

/// Drawing collaborator of the session.
///
/// GPU resources for entities are created by the implementation the first time an
/// id shows up in a `FrameView`; the session never rasterizes anything itself.
pub trait SceneRenderer {
    fn resize_target(&mut self, viewport: Viewport);

    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<FrameOutcome>;
}
