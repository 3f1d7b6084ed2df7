//! Deterministic clock for tests.

use metric_recorder_ports::Clock;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds since the epoch of the instant a fresh [`ManualClock`] reports.
pub const MANUAL_CLOCK_EPOCH_SECS: u64 = 1_700_000_000;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<SystemTime>,
}

impl ManualClock {
    /// Create a clock fixed at [`MANUAL_CLOCK_EPOCH_SECS`].
    pub fn new() -> Self {
        Self::at(UNIX_EPOCH + Duration::from_secs(MANUAL_CLOCK_EPOCH_SECS))
    }

    /// Create a clock fixed at `instant`.
    pub fn at(instant: SystemTime) -> Self {
        Self {
            current: Mutex::new(instant),
        }
    }

    /// The instant the clock currently reports.
    pub fn instant(&self) -> SystemTime {
        *self.current.lock().expect("manual clock lock")
    }

    /// Jump to `instant`, forwards or backwards.
    pub fn set(&self, instant: SystemTime) {
        *self.current.lock().expect("manual clock lock") = instant;
    }

    /// Move forward by `step` and return the new instant.
    pub fn forward(&self, step: Duration) -> SystemTime {
        let mut guard = self.current.lock().expect("manual clock lock");
        *guard += step;
        *guard
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.instant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_moves_only_when_told() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.now(), start);

        let later = clock.forward(Duration::from_millis(200));
        assert_eq!(later, start + Duration::from_millis(200));
        assert_eq!(clock.now(), later);

        clock.set(start);
        assert_eq!(clock.instant(), start);
    }
}
