//! Recorder construction contract.

use crate::clock::SystemClock;
use crate::recorder::MetricRecorder;
use metric_recorder_ports::{Clock, MetricHooks};
use std::sync::Arc;

/// Produces a fresh, open recorder per operation.
///
/// Implementations decide the storage strategy; callers only name the
/// operation. Recorders are never shared or pooled.
pub trait MetricRecorderFactory {
    /// Storage strategy of the produced recorders.
    type Hooks: MetricHooks;

    /// Create a recorder reading time from `clock`.
    fn new_recorder_with_clock(
        &self,
        operation: &str,
        clock: Arc<dyn Clock>,
    ) -> MetricRecorder<Self::Hooks>;

    /// Create a recorder on the wall clock.
    fn new_recorder(&self, operation: &str) -> MetricRecorder<Self::Hooks> {
        self.new_recorder_with_clock(operation, Arc::new(SystemClock))
    }
}

impl<F: MetricRecorderFactory + ?Sized> MetricRecorderFactory for Arc<F> {
    type Hooks = F::Hooks;

    fn new_recorder_with_clock(
        &self,
        operation: &str,
        clock: Arc<dyn Clock>,
    ) -> MetricRecorder<Self::Hooks> {
        (**self).new_recorder_with_clock(operation, clock)
    }

    fn new_recorder(&self, operation: &str) -> MetricRecorder<Self::Hooks> {
        (**self).new_recorder(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_testkit::{ManualClock, StubMetrics};
    use std::error::Error;

    struct StubFactory;

    impl MetricRecorderFactory for StubFactory {
        type Hooks = StubMetrics;

        fn new_recorder_with_clock(
            &self,
            operation: &str,
            clock: Arc<dyn Clock>,
        ) -> MetricRecorder<StubMetrics> {
            MetricRecorder::new(operation, clock, StubMetrics::new())
        }
    }

    #[test]
    fn each_call_returns_an_independent_open_recorder() -> Result<(), Box<dyn Error>> {
        let factory = Arc::new(StubFactory);
        let mut first = factory.new_recorder("first");
        let second = factory.new_recorder("second");
        first.close()?;

        assert!(first.is_closed());
        assert!(!second.is_closed());
        assert_eq!(second.operation(), "second");
        Ok(())
    }

    #[test]
    fn injected_clock_sets_the_start_time() {
        let clock = Arc::new(ManualClock::new());
        let recorder = StubFactory.new_recorder_with_clock("op", clock.clone());
        assert_eq!(recorder.start_time(), clock.instant());
    }
}
