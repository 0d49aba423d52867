use std::time::Duration;

/// Fixed-interval clock driven by elapsed wall time.
///
/// Accumulates frame deltas and reports how many whole intervals have passed,
/// carrying the remainder into the next call.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
    cancelled: bool,
}

impl IntervalTimer {
    /// A zero interval is bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            cancelled: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advance by `dt`. Returns the number of times the timer fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.cancelled {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    /// Stop the timer for good. Later `advance` calls never fire.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut t = IntervalTimer::from_millis(500);
        assert_eq!(t.advance(Duration::from_millis(499)), 0);
        assert_eq!(t.advance(Duration::from_millis(1)), 1);
        assert_eq!(t.advance(Duration::from_millis(250)), 0);
        assert_eq!(t.advance(Duration::from_millis(250)), 1);
    }

    #[test]
    fn catches_up_after_long_frame() {
        let mut t = IntervalTimer::from_millis(500);
        assert_eq!(t.advance(Duration::from_millis(1600)), 3);
        assert_eq!(t.advance(Duration::from_millis(400)), 1);
    }

    #[test]
    fn sixty_fps_for_one_second() {
        let mut t = IntervalTimer::from_millis(500);
        let frame = Duration::from_micros(16_667);
        let fired: u32 = (0..60).map(|_| t.advance(frame)).sum();
        assert_eq!(fired, 2);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = IntervalTimer::from_millis(10);
        t.cancel();
        assert!(t.is_cancelled());
        assert_eq!(t.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let t = IntervalTimer::new(Duration::ZERO);
        assert_eq!(t.interval(), Duration::from_millis(1));
    }
}
