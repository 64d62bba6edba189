use std::time::{Duration, Instant};

/// Fixed-rate frame scheduler.
///
/// Frames that fall behind are skipped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
    skipped: u64,
}

impl FrameClock {
    /// A clock ticking `tick_rate` times per second. Rates that are not
    /// positive, or too small for a `Duration`, never sleep.
    pub fn new(tick_rate: f32) -> Self {
        let interval = (tick_rate.is_finite() && tick_rate > 0.0)
            .then(|| Duration::try_from_secs_f32(1.0 / tick_rate).ok())
            .flatten();
        Self {
            interval,
            next_deadline: None,
            skipped: 0,
        }
    }

    /// A clock that never sleeps, for headless runs and tests.
    pub fn unthrottled() -> Self {
        Self {
            interval: None,
            next_deadline: None,
            skipped: 0,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Number of frame slots dropped because a frame overran.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Block until the next frame is due.
    pub fn wait_next(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now + interval);

        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next_deadline = Some(deadline + interval);
            return;
        }

        // Behind schedule: drop the missed slots and realign on the next one
        let behind = now - deadline;
        let missed = (behind.as_nanos() / interval.as_nanos().max(1)) as u64;
        self.skipped += missed;
        self.next_deadline = Some(deadline + interval * (missed as u32 + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_from_tick_rate() {
        let clock = FrameClock::new(20.0);
        let interval = clock.interval().unwrap();
        assert!((interval.as_secs_f32() - 0.05).abs() < 1e-4);
    }

    #[test]
    fn zero_rate_is_unthrottled() {
        assert!(FrameClock::new(0.0).interval().is_none());
        assert!(FrameClock::new(f32::NAN).interval().is_none());
    }

    #[test]
    fn tiny_rate_does_not_panic() {
        assert!(FrameClock::new(1e-20).interval().is_none());
        assert!(FrameClock::new(f32::MIN_POSITIVE).interval().is_none());
    }

    #[test]
    fn unthrottled_never_sleeps() {
        let mut clock = FrameClock::unthrottled();
        let start = Instant::now();
        for _ in 0..1000 {
            clock.wait_next();
        }
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(clock.skipped_frames(), 0);
    }

    #[test]
    fn overrun_skips_missed_frames() {
        let mut clock = FrameClock::new(1000.0);
        clock.wait_next();
        std::thread::sleep(Duration::from_millis(20));
        clock.wait_next();
        assert!(
            clock.skipped_frames() > 0,
            "A 20ms stall at 1kHz should skip frames"
        );
    }
}
