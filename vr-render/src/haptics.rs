use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const DEFAULT_HAPTIC_INTERVAL: Duration = Duration::from_millis(50);

/// Monotonic time source used for haptic rate limiting and frame timing.
pub trait Clock {
    // Time elapsed since an arbitrary fixed origin.
    fn elapsed(&self) -> Duration;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> MonotonicClock {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> MonotonicClock {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

/// Lets one haptic pulse through per interval. Requests inside the window are dropped.
#[derive(Debug, Clone)]
pub struct HapticLimiter {
    interval: Duration,
    last_pulse: Option<Duration>,
}

impl HapticLimiter {
    pub fn new(interval: Duration) -> HapticLimiter {
        HapticLimiter {
            interval,
            last_pulse: None,
        }
    }

    pub fn try_acquire(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_pulse {
            if now < last + self.interval {
                return false;
            }
        }
        self.last_pulse = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_pulse = None;
    }
}

impl Default for HapticLimiter {
    fn default() -> HapticLimiter {
        HapticLimiter::new(DEFAULT_HAPTIC_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_pulses_inside_window() {
        let mut limiter = HapticLimiter::default();
        assert!(limiter.try_acquire(Duration::from_millis(0)));
        assert!(!limiter.try_acquire(Duration::from_millis(30)));
        assert!(limiter.try_acquire(Duration::from_millis(60)));
        assert!(!limiter.try_acquire(Duration::from_millis(109)));
        assert!(limiter.try_acquire(Duration::from_millis(110)));
    }

    #[test]
    fn dropped_requests_do_not_extend_window() {
        let mut limiter = HapticLimiter::new(Duration::from_millis(50));
        assert!(limiter.try_acquire(Duration::from_millis(100)));
        for t in 101..150 {
            assert!(!limiter.try_acquire(Duration::from_millis(t)));
        }
        assert!(limiter.try_acquire(Duration::from_millis(150)));
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(30));
        assert_eq!(other.elapsed(), Duration::from_millis(30));
    }
}
