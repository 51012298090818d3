use crate::scene_graph::{EntityId, EntityKind, EntityRegistry};
use crate::session::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyEntry {
    pub id: EntityId,
    pub kind: EntityKind,
    pub label: String,
    pub selected: bool,
}

/// Newest-first projection of the registry. Rebuilt from the registry and the
/// selection, never edited on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyView {
    entries: Vec<HierarchyEntry>,
}

impl HierarchyView {
    pub fn project(registry: &EntityRegistry, selection: &Selection) -> Self {
        let entries = registry
            .iter_newest_first()
            .map(|(id, entity)| HierarchyEntry {
                id,
                kind: entity.kind,
                label: entity.name.clone(),
                selected: selection.is_selected(id),
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[HierarchyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<&HierarchyEntry> {
        self.entries.iter().find(|entry| entry.selected)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }
}
