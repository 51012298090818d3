use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Stop,
}

impl PlaybackCommand {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackCommand::Play => "Play",
            PlaybackCommand::Pause => "Pause",
            PlaybackCommand::Stop => "Stop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub command: PlaybackCommand,
    pub from: PlaybackState,
    pub to: PlaybackState,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// Stop rewinds accumulated animation even when the machine was already stopped.
    pub fn resets_animation(&self) -> bool {
        self.command == PlaybackCommand::Stop
    }
}

/// Stopped / Playing / Paused. Every command maps to a target state; requests that
/// make no sense in the current state leave it unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaybackMachine {
    state: PlaybackState,
}

impl PlaybackMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn apply(&mut self, command: PlaybackCommand) -> Transition {
        let from = self.state;
        let to = match (command, from) {
            (PlaybackCommand::Play, _) => PlaybackState::Playing,
            (PlaybackCommand::Pause, PlaybackState::Playing) => PlaybackState::Paused,
            (PlaybackCommand::Pause, other) => other,
            (PlaybackCommand::Stop, _) => PlaybackState::Stopped,
        };

        self.state = to;
        Transition { command, from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_in(state: PlaybackState) -> PlaybackMachine {
        let mut machine = PlaybackMachine::new();
        match state {
            PlaybackState::Stopped => {}
            PlaybackState::Playing => {
                machine.apply(PlaybackCommand::Play);
            }
            PlaybackState::Paused => {
                machine.apply(PlaybackCommand::Play);
                machine.apply(PlaybackCommand::Pause);
            }
        }
        assert_eq!(machine.state(), state);
        machine
    }

    #[test]
    fn starts_stopped() {
        assert_eq!(PlaybackMachine::new().state(), PlaybackState::Stopped);
    }

    #[test]
    fn transition_table() {
        use PlaybackCommand::*;
        use PlaybackState::*;

        let table = [
            (Stopped, Play, Playing),
            (Paused, Play, Playing),
            (Playing, Play, Playing),
            (Playing, Pause, Paused),
            (Paused, Pause, Paused),
            (Stopped, Pause, Stopped),
            (Playing, Stop, Stopped),
            (Paused, Stop, Stopped),
            (Stopped, Stop, Stopped),
        ];

        for (from, command, expected) in table {
            let mut machine = machine_in(from);
            let transition = machine.apply(command);
            assert_eq!(machine.state(), expected, "{from:?} --{command:?}-->");
            assert_eq!(transition.from, from);
            assert_eq!(transition.to, expected);
            assert_eq!(transition.changed(), from != expected);
        }
    }

    #[test]
    fn only_stop_resets_animation() {
        let mut machine = machine_in(PlaybackState::Playing);
        assert!(!machine.apply(PlaybackCommand::Pause).resets_animation());
        assert!(machine.apply(PlaybackCommand::Stop).resets_animation());
        assert!(machine.apply(PlaybackCommand::Stop).resets_animation());
    }
}
