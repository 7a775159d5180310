//! General time utility functions

use chrono;
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else {
        None
    }
}

/// A source of monotonic time since the start of execution.
///
/// Everything that waits in the exec (settle windows, timeouts, the endgame
/// timer) compares against a clock rather than sleeping, so that a simulated
/// clock can be substituted.
pub trait Clock {
    /// Time elapsed since the clock was started.
    fn now(&self) -> Duration;
}

/// A clock backed by the host's monotonic clock.
pub struct MonotonicClock {
    start: Instant
}

/// A manually advanced clock.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now()
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

impl ManualClock {
    /// Advance the clock by the given duration.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(1500)), 
            Some(1.5)
        );
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::default();
        assert_eq!(clock.now(), Duration::from_secs(0));

        clock.advance(Duration::from_millis(10));
        clock.advance(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(20));

        clock.set(Duration::from_secs(85));
        assert_eq!(clock.now(), Duration::from_secs(85));
    }
}
