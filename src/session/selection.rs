use crate::scene_graph::{EntityId, EntityRegistry};

/// Holds at most one selected entity. The id is a weak reference into the registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    current: Option<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id` if it exists in `registry`. Returns `true` when the selection changed.
    pub fn select(&mut self, id: EntityId, registry: &EntityRegistry) -> bool {
        if !registry.contains(id) {
            log::debug!("Ignoring selection of unknown entity {:?}", id);
            return false;
        }

        if self.current == Some(id) {
            return false;
        }

        self.current = Some(id);
        true
    }

    pub fn current(&self) -> Option<EntityId> {
        self.current
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.current == Some(id)
    }

    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Drops the selection if it no longer resolves. Returns `true` when it was cleared.
    pub fn prune(&mut self, registry: &EntityRegistry) -> bool {
        match self.current {
            Some(id) if !registry.contains(id) => self.clear(),
            _ => false,
        }
    }
}
