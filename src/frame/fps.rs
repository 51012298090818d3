use std::time::Duration;

/// Rolling frame counter that reports frames per second once per `interval`.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: Duration,
    frames: u32,
    elapsed: Duration,
}

impl FpsCounter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Counts one frame that took `delta`. Returns a rounded sample when more than
    /// `interval` has accumulated, then starts a new window.
    pub fn record(&mut self, delta: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed <= self.interval || self.elapsed.is_zero() {
            return None;
        }

        let fps = (self.frames as f64 / self.elapsed.as_secs_f64()).round() as f32;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_after_interval_and_resets() {
        let mut counter = FpsCounter::new(Duration::from_millis(500));
        let frame = Duration::from_millis(10);

        let mut samples = Vec::new();
        for _ in 0..120 {
            if let Some(fps) = counter.record(frame) {
                samples.push(fps);
            }
        }

        // 51 frames of 10ms cross the 500ms threshold, twice within 1.2s.
        assert_eq!(samples, [100.0, 100.0]);
    }

    #[test]
    fn quiet_until_interval_exceeded() {
        let mut counter = FpsCounter::new(Duration::from_millis(500));
        assert_eq!(counter.record(Duration::from_millis(250)), None);
        assert_eq!(counter.record(Duration::from_millis(250)), None);
        assert_eq!(counter.record(Duration::from_millis(100)), Some(5.0));
    }

    #[test]
    fn zero_deltas_never_divide_by_zero() {
        let mut counter = FpsCounter::new(Duration::ZERO);
        for _ in 0..10 {
            assert_eq!(counter.record(Duration::ZERO), None);
        }
        assert_eq!(counter.record(Duration::from_millis(100)), Some(110.0));
    }
}
