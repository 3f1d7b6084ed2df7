//! Wall-clock time source.

use metric_recorder_ports::Clock;
use std::time::SystemTime;

/// [`Clock`] backed by the operating system's wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
