//! Capture adapter: keeps every metric in memory for later inspection.
//!
//! Readback is gated on close. A half-finished operation has no
//! `Time`/`EndTime` yet and may still have intervals running, so every getter
//! fails with invalid-state until the recorder's close hook has run.

use crate::store::MetricStore;
use metric_recorder_domain::{DuplicatePolicy, MetricSnapshot, RecorderState};
use metric_recorder_ports::{CloseContext, MetricHooks};
use metric_recorder_shared::Result;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Hooks that store every metric and expose them after close.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetrics {
    store: MetricStore,
    state: RecorderState,
    operation: Option<String>,
}

impl InMemoryMetrics {
    /// Last-write-wins capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture with an explicit duplicate policy.
    #[must_use]
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            store: MetricStore::new(policy),
            ..Self::default()
        }
    }

    /// Active duplicate policy.
    #[must_use]
    pub const fn policy(&self) -> DuplicatePolicy {
        self.store.policy()
    }

    /// Whether the close hook has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Property value by name.
    pub fn property(&self, name: &str) -> Result<Option<&str>> {
        self.state.ensure_closed()?;
        Ok(self.store.properties.get(name).map(String::as_str))
    }

    /// Timestamp by name.
    pub fn timestamp(&self, name: &str) -> Result<Option<SystemTime>> {
        self.state.ensure_closed()?;
        Ok(self.store.timestamps.get(name).copied())
    }

    /// Summed count by name.
    pub fn count(&self, name: &str) -> Result<Option<f64>> {
        self.state.ensure_closed()?;
        Ok(self.store.counts.get(name).copied())
    }

    /// Summed duration by name.
    pub fn duration(&self, name: &str) -> Result<Option<Duration>> {
        self.state.ensure_closed()?;
        Ok(self.store.durations.get(name).copied())
    }

    /// All properties.
    pub fn properties(&self) -> Result<&HashMap<String, String>> {
        self.state.ensure_closed()?;
        Ok(&self.store.properties)
    }

    /// All timestamps.
    pub fn timestamps(&self) -> Result<&HashMap<String, SystemTime>> {
        self.state.ensure_closed()?;
        Ok(&self.store.timestamps)
    }

    /// All counts.
    pub fn counts(&self) -> Result<&HashMap<String, f64>> {
        self.state.ensure_closed()?;
        Ok(&self.store.counts)
    }

    /// All durations.
    pub fn durations(&self) -> Result<&HashMap<String, Duration>> {
        self.state.ensure_closed()?;
        Ok(&self.store.durations)
    }

    /// Ordered, owned copy of everything captured.
    pub fn snapshot(&self) -> Result<MetricSnapshot> {
        self.state.ensure_closed()?;
        Ok(self.store.to_snapshot(self.operation.clone()))
    }
}

impl MetricHooks for InMemoryMetrics {
    fn on_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.store.put_property(name, value)
    }

    fn on_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        self.store.put_timestamp(name, time)
    }

    fn on_count(&mut self, name: &str, value: f64) -> Result<()> {
        self.store.add_count(name, value);
        Ok(())
    }

    fn on_duration(&mut self, name: &str, duration: Duration) -> Result<()> {
        self.store.add_duration(name, duration);
        Ok(())
    }

    fn on_close(&mut self, context: &CloseContext<'_>) -> Result<()> {
        self.operation = Some(context.operation.to_owned());
        self.state = RecorderState::Closed;
        Ok(())
    }
}
