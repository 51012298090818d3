use std::fmt;

use crate::scene_graph::{EntityId, EntityKind};
use crate::session::hierarchy::HierarchyView;
use crate::session::playback::PlaybackState;

/// Notifications the UI layer renders. Drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    EntityCreated { id: EntityId, kind: EntityKind },
    HierarchyChanged(HierarchyView),
    SelectionChanged(Option<EntityId>),
    PlaybackChanged(PlaybackState),
    FpsSampled(f32),
    Console(String),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::EntityCreated { id, kind } => {
                write!(f, "EntityCreated id={} kind={}", id.index(), kind)
            }
            SessionEvent::HierarchyChanged(view) => {
                write!(f, "HierarchyChanged entries={}", view.len())
            }
            SessionEvent::SelectionChanged(Some(id)) => {
                write!(f, "SelectionChanged id={}", id.index())
            }
            SessionEvent::SelectionChanged(None) => write!(f, "SelectionChanged none"),
            SessionEvent::PlaybackChanged(state) => write!(f, "PlaybackChanged {state}"),
            SessionEvent::FpsSampled(fps) => write!(f, "FpsSampled {fps:.0}"),
            SessionEvent::Console(message) => write!(f, "Console {message}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SessionEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: SessionEvent) {
        log::trace!("{event}");
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }
}
