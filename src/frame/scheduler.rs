use std::time::{Duration, Instant};

/// Drives the per-frame tick. The host asks for a new frame after every tick while
/// the scheduler is running; stopping it ends the cycle.
///
/// Time is passed in explicitly so tests can step frames with synthetic instants.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    last_tick: Option<Instant>,
    running: bool,
    frame_index: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }

        log::info!("Frame scheduler started");
        self.running = true;
        self.last_tick = Some(now);
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        log::info!("Frame scheduler stopped after {} frames", self.frame_index);
        self.running = false;
        self.last_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the wall time elapsed since the previous tick, or `None` while stopped.
    /// Intervals are variable; a clock that went backwards yields zero.
    pub fn advance(&mut self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }

        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);

        self.last_tick = Some(now);
        self.frame_index += 1;
        Some(delta)
    }
}
