//! Hooks that remember everything they were handed.

use metric_recorder_ports::{CloseContext, MetricHooks};
use metric_recorder_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Capturing hooks with ungated getters.
///
/// Properties and timestamps overwrite, counts and durations sum. Unlike the
/// production in-memory adapter, nothing here checks lifecycle, so a test can
/// look at what reached the hooks at any point.
#[derive(Debug, Default, Clone)]
pub struct StubMetrics {
    /// Recorded properties.
    pub properties: HashMap<String, String>,
    /// Recorded timestamps.
    pub timestamps: HashMap<String, SystemTime>,
    /// Summed counts.
    pub counts: HashMap<String, f64>,
    /// Summed durations.
    pub durations: HashMap<String, Duration>,
    /// How many times `on_close` ran.
    pub close_calls: usize,
    /// Context handed to the last `on_close`.
    pub last_close: Option<(String, SystemTime, SystemTime)>,
}

impl StubMetrics {
    /// Create empty hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `on_close` ran at least once.
    pub fn close_hook_called(&self) -> bool {
        self.close_calls > 0
    }

    /// Property by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Timestamp by name.
    pub fn timestamp(&self, name: &str) -> Option<SystemTime> {
        self.timestamps.get(name).copied()
    }

    /// Count by name.
    pub fn count(&self, name: &str) -> Option<f64> {
        self.counts.get(name).copied()
    }

    /// Duration by name.
    pub fn duration(&self, name: &str) -> Option<Duration> {
        self.durations.get(name).copied()
    }
}

impl MetricHooks for StubMetrics {
    fn on_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.properties.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn on_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        self.timestamps.insert(name.to_owned(), time);
        Ok(())
    }

    fn on_count(&mut self, name: &str, value: f64) -> Result<()> {
        *self.counts.entry(name.to_owned()).or_insert(0.0) += value;
        Ok(())
    }

    fn on_duration(&mut self, name: &str, duration: Duration) -> Result<()> {
        *self.durations.entry(name.to_owned()).or_default() += duration;
        Ok(())
    }

    fn on_close(&mut self, context: &CloseContext<'_>) -> Result<()> {
        self.close_calls += 1;
        self.last_close = Some((
            context.operation.to_owned(),
            context.start_time,
            context.end_time,
        ));
        Ok(())
    }
}

/// Hooks that fail the close hook, for error-path tests.
#[derive(Debug, Default)]
pub struct FailingCloseMetrics {
    /// Everything that reached the hooks before close.
    pub inner: StubMetrics,
}

impl MetricHooks for FailingCloseMetrics {
    fn on_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.inner.on_property(name, value)
    }

    fn on_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        self.inner.on_timestamp(name, time)
    }

    fn on_count(&mut self, name: &str, value: f64) -> Result<()> {
        self.inner.on_count(name, value)
    }

    fn on_duration(&mut self, name: &str, duration: Duration) -> Result<()> {
        self.inner.on_duration(name, duration)
    }

    fn on_close(&mut self, context: &CloseContext<'_>) -> Result<()> {
        self.inner.on_close(context)?;
        Err(ErrorEnvelope::unexpected(
            ErrorCode::new("testkit", "close_failed"),
            "close hook failed on purpose",
            ErrorClass::NonRetriable,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn stub_overwrites_and_sums() -> Result<()> {
        let mut stub = StubMetrics::new();
        stub.on_property("Ship", "Enterprise")?;
        stub.on_property("Ship", "Voyager")?;
        stub.on_count("Rings", 8.0)?;
        stub.on_count("Rings", 12.0)?;
        stub.on_duration("Warp", Duration::from_millis(5))?;
        stub.on_duration("Warp", Duration::from_millis(7))?;

        assert_eq!(stub.property("Ship"), Some("Voyager"));
        assert_eq!(stub.count("Rings"), Some(20.0));
        assert_eq!(stub.duration("Warp"), Some(Duration::from_millis(12)));
        assert!(!stub.close_hook_called());

        stub.on_close(&CloseContext {
            operation: "op",
            start_time: UNIX_EPOCH,
            end_time: UNIX_EPOCH,
        })?;
        assert!(stub.close_hook_called());
        Ok(())
    }
}
