use std::collections::VecDeque;

use imgui::Condition;

use crate::{
    scene_graph::EntityKind,
    session::{HierarchyView, PlaybackState, SessionCommand, SessionEvent},
};

const PANEL_WIDTH: f32 = 260.0;

/// Editor panels. Holds only what it has been told through session events and
/// hands user intent back as `SessionCommand`s.
pub struct EditorUi {
    hierarchy: HierarchyView,
    console: VecDeque<String>,
    console_capacity: usize,
    fps: Option<f32>,
    playback: PlaybackState,
}

impl EditorUi {
    pub fn new(console_capacity: usize) -> Self {
        Self {
            hierarchy: HierarchyView::default(),
            console: VecDeque::new(),
            console_capacity: console_capacity.max(1),
            fps: None,
            playback: PlaybackState::default(),
        }
    }

    pub fn consume(&mut self, events: impl IntoIterator<Item = SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::HierarchyChanged(view) => self.hierarchy = view,
                SessionEvent::PlaybackChanged(state) => self.playback = state,
                SessionEvent::FpsSampled(fps) => self.fps = Some(fps),
                SessionEvent::Console(message) => self.log(message),
                SessionEvent::EntityCreated { .. } | SessionEvent::SelectionChanged(_) => {}
            }
        }
    }

    /// Newest message first.
    pub fn log(&mut self, message: String) {
        self.console.push_front(message);
        self.console.truncate(self.console_capacity);
    }

    pub fn console(&self) -> impl Iterator<Item = &str> {
        self.console.iter().map(String::as_str)
    }

    pub fn hierarchy(&self) -> &HierarchyView {
        &self.hierarchy
    }

    pub fn fps_label(&self) -> String {
        match self.fps {
            Some(fps) => format!("FPS: {fps:.0}"),
            None => "FPS: -".to_string(),
        }
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn draw(&self, ui: &imgui::Ui) -> Vec<SessionCommand> {
        let mut commands = Vec::new();

        ui.window("Toolbar")
            .position([10.0, 10.0], Condition::FirstUseEver)
            .size([PANEL_WIDTH, 90.0], Condition::FirstUseEver)
            .build(|| {
                for (i, kind) in EntityKind::ALL.into_iter().enumerate() {
                    if i > 0 {
                        ui.same_line();
                    }
                    if ui.button(format!("Add {}", kind.label())) {
                        commands.push(SessionCommand::AddEntity(kind));
                    }
                }

                if ui.button("Play") {
                    commands.push(SessionCommand::Play);
                }
                ui.same_line();
                if ui.button("Pause") {
                    commands.push(SessionCommand::Pause);
                }
                ui.same_line();
                if ui.button("Stop") {
                    commands.push(SessionCommand::Stop);
                }
            });

        ui.window("Hierarchy")
            .position([10.0, 110.0], Condition::FirstUseEver)
            .size([PANEL_WIDTH, 260.0], Condition::FirstUseEver)
            .build(|| {
                for entry in self.hierarchy.entries() {
                    let label = format!("{}##{}", entry.label, entry.id.index());
                    if ui.selectable_config(label).selected(entry.selected).build()
                        && !entry.selected
                    {
                        commands.push(SessionCommand::Select(entry.id));
                    }
                }
            });

        ui.window("Console")
            .position([10.0, 380.0], Condition::FirstUseEver)
            .size([PANEL_WIDTH, 200.0], Condition::FirstUseEver)
            .build(|| {
                for line in self.console() {
                    ui.text_wrapped(line);
                }
            });

        ui.window("Stats")
            .position([PANEL_WIDTH + 20.0, 10.0], Condition::FirstUseEver)
            .size([140.0, 60.0], Condition::FirstUseEver)
            .no_decoration()
            .build(|| {
                ui.text(self.fps_label());
                ui.text(format!("{}", self.playback));
            });

        commands
    }
}
