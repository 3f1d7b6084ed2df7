//! Recorder factories for each storage adapter.

use crate::in_memory::InMemoryMetrics;
use crate::json_lines::JsonLinesMetrics;
use crate::log_sink::LogSink;
use crate::noop::NoopMetrics;
use metric_recorder_core::{MetricRecorder, MetricRecorderFactory};
use metric_recorder_domain::DuplicatePolicy;
use metric_recorder_ports::Clock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds recorders that capture into [`InMemoryMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InMemoryMetricRecorderFactory {
    policy: DuplicatePolicy,
}

impl InMemoryMetricRecorderFactory {
    /// Last-write-wins capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture with an explicit duplicate policy.
    #[must_use]
    pub const fn with_policy(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }
}

impl MetricRecorderFactory for InMemoryMetricRecorderFactory {
    type Hooks = InMemoryMetrics;

    fn new_recorder_with_clock(
        &self,
        operation: &str,
        clock: Arc<dyn Clock>,
    ) -> MetricRecorder<InMemoryMetrics> {
        MetricRecorder::new(operation, clock, InMemoryMetrics::with_policy(self.policy))
    }
}

/// Builds recorders that discard everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopMetricRecorderFactory;

impl MetricRecorderFactory for NoopMetricRecorderFactory {
    type Hooks = NoopMetrics;

    fn new_recorder_with_clock(
        &self,
        operation: &str,
        clock: Arc<dyn Clock>,
    ) -> MetricRecorder<NoopMetrics> {
        MetricRecorder::new(operation, clock, NoopMetrics)
    }
}

/// Builds recorders that publish one JSON line each on close.
#[derive(Clone)]
pub struct JsonLinesMetricRecorderFactory {
    sink: Arc<dyn LogSink>,
    base_properties: Arc<BTreeMap<String, String>>,
    policy: DuplicatePolicy,
}

impl JsonLinesMetricRecorderFactory {
    /// Publish to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_properties: Arc::default(),
            policy: DuplicatePolicy::default(),
        }
    }

    /// Attach base properties to every record.
    #[must_use]
    pub fn with_base_properties(mut self, base: BTreeMap<String, String>) -> Self {
        self.base_properties = Arc::new(base);
        self
    }

    /// Use an explicit duplicate policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl fmt::Debug for JsonLinesMetricRecorderFactory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JsonLinesMetricRecorderFactory")
            .field("base_properties", &self.base_properties)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl MetricRecorderFactory for JsonLinesMetricRecorderFactory {
    type Hooks = JsonLinesMetrics;

    fn new_recorder_with_clock(
        &self,
        operation: &str,
        clock: Arc<dyn Clock>,
    ) -> MetricRecorder<JsonLinesMetrics> {
        let hooks = JsonLinesMetrics::new(Arc::clone(&self.sink))
            .with_base_properties(Arc::clone(&self.base_properties))
            .with_policy(self.policy);
        MetricRecorder::new(operation, clock, hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_testkit::ManualClock;
    use std::error::Error;
    use std::time::Duration;

    #[test]
    fn in_memory_factory_builds_fresh_recorders() -> Result<(), Box<dyn Error>> {
        let factory = InMemoryMetricRecorderFactory::new();
        let clock = Arc::new(ManualClock::new());

        let mut first = factory.new_recorder_with_clock("first", clock.clone());
        let mut second = factory.new_recorder_with_clock("second", clock.clone());
        first.add_count("Rings", 1.0)?;
        clock.forward(Duration::from_millis(10));
        first.close()?;
        second.close()?;

        assert_eq!(first.hooks().count("Rings")?, Some(1.0));
        assert_eq!(second.hooks().count("Rings")?, None);
        assert_eq!(second.hooks().property("Operation")?, Some("second"));
        Ok(())
    }

    #[test]
    fn in_memory_factory_passes_its_policy() {
        let factory = InMemoryMetricRecorderFactory::with_policy(DuplicatePolicy::Reject);
        let recorder = factory.new_recorder("op");
        assert_eq!(recorder.hooks().policy(), DuplicatePolicy::Reject);
    }

    #[test]
    fn noop_factory_uses_the_wall_clock_by_default() {
        let recorder = NoopMetricRecorderFactory.new_recorder("op");
        assert!(recorder.start_time() > std::time::UNIX_EPOCH);
        assert!(!recorder.is_closed());
    }
}
