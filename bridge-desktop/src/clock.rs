//! Monotonic clock backed by `std::time::Instant`.

use bridge_traits::time::Clock;
use std::time::Instant;

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = MonotonicClock::new();
        let first = clock.now_millis();
        std::thread::sleep(Duration::from_millis(5));
        let second = clock.now_millis();

        assert!(first >= 0.0);
        assert!(second >= first + 4.0);
        assert!(clock.elapsed_since(second) >= 0.0);
    }
}
