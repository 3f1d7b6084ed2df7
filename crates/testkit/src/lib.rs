//! # metric-recorder-testkit
//!
//! Test helpers: a manual clock, capturing hooks, and a capturing logger.
//! This crate depends on `ports` and `shared`.

pub mod clock;
pub mod logging;
pub mod stub;

pub use clock::{MANUAL_CLOCK_EPOCH_SECS, ManualClock};
pub use logging::CaptureLogger;
pub use stub::{FailingCloseMetrics, StubMetrics};

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_ports::ports_crate_version;
    use metric_recorder_shared::shared_crate_version;

    #[test]
    fn testkit_crate_compiles() {
        let version = testkit_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn testkit_can_use_ports_and_shared() {
        assert!(!ports_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
