//! Publishing adapter: one JSON object per closed recorder.

use crate::log_sink::LogSink;
use crate::store::MetricStore;
use metric_recorder_domain::{DuplicatePolicy, duration_millis, epoch_millis};
use metric_recorder_ports::{CloseContext, MetricHooks};
use metric_recorder_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result, redact_if_secret};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Value of the `type` field on every published line.
pub const METRICS_RECORD_TYPE: &str = "metrics";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    operation: &'a str,
    start_time_ms: u64,
    end_time_ms: u64,
    properties: BTreeMap<&'a str, String>,
    timestamps_ms: BTreeMap<&'a str, u64>,
    counts: BTreeMap<&'a str, f64>,
    durations_ms: BTreeMap<&'a str, u64>,
}

/// Hooks that aggregate like the capture adapter and write a single JSON
/// line to a [`LogSink`] when the recorder closes.
///
/// Timestamps are emitted as epoch milliseconds and durations as whole
/// milliseconds. Property values under secret-looking names are redacted.
/// Base properties are attached to every line; a recorded property with the
/// same name takes precedence.
#[derive(Clone)]
pub struct JsonLinesMetrics {
    store: MetricStore,
    sink: Arc<dyn LogSink>,
    base_properties: Arc<BTreeMap<String, String>>,
    published: bool,
}

impl JsonLinesMetrics {
    /// Publish to `sink` with no base properties.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            store: MetricStore::default(),
            sink,
            base_properties: Arc::default(),
            published: false,
        }
    }

    /// Attach base properties to every published line.
    #[must_use]
    pub fn with_base_properties(mut self, base: Arc<BTreeMap<String, String>>) -> Self {
        self.base_properties = base;
        self
    }

    /// Use an explicit duplicate policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.store = MetricStore::new(policy);
        self
    }

    /// Whether the line reached the sink.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.published
    }

    fn render(&self, context: &CloseContext<'_>) -> Result<String> {
        let mut properties: BTreeMap<&str, String> = self
            .base_properties
            .iter()
            .map(|(name, value)| (name.as_str(), redact_if_secret(name, value)))
            .collect();
        properties.extend(
            self.store
                .properties
                .iter()
                .map(|(name, value)| (name.as_str(), redact_if_secret(name, value))),
        );

        let record = MetricsRecord {
            record_type: METRICS_RECORD_TYPE,
            operation: context.operation,
            start_time_ms: epoch_millis(context.start_time),
            end_time_ms: epoch_millis(context.end_time),
            properties,
            timestamps_ms: self
                .store
                .timestamps
                .iter()
                .map(|(name, time)| (name.as_str(), epoch_millis(*time)))
                .collect(),
            counts: self
                .store
                .counts
                .iter()
                .map(|(name, value)| (name.as_str(), *value))
                .collect(),
            durations_ms: self
                .store
                .durations
                .iter()
                .map(|(name, duration)| (name.as_str(), duration_millis(*duration)))
                .collect(),
        };

        let mut line = serde_json::to_string(&record).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("adapters", "metrics_serialize_failed"),
                format!("failed to encode metrics record: {error}"),
                ErrorClass::NonRetriable,
            )
            .with_metadata("operation", context.operation)
        })?;
        line.push('\n');
        Ok(line)
    }
}

impl fmt::Debug for JsonLinesMetrics {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JsonLinesMetrics")
            .field("store", &self.store)
            .field("base_properties", &self.base_properties.len())
            .field("published", &self.published)
            .finish_non_exhaustive()
    }
}

impl MetricHooks for JsonLinesMetrics {
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
        let line = self.render(context)?;
        self.sink.try_write_line(&line).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("adapters", "metrics_publish_failed"),
                format!("failed to write metrics record: {error}"),
                ErrorClass::Retriable,
            )
            .with_metadata("operation", context.operation)
        })?;
        self.published = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::WriterLogSink;
    use metric_recorder_core::MetricRecorder;
    use metric_recorder_shared::REDACTED;
    use metric_recorder_testkit::ManualClock;
    use serde_json::Value;
    use std::error::Error;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct MemorySink {
        lines: Mutex<Vec<String>>,
    }

    impl MemorySink {
        fn take(&self) -> Vec<String> {
            let mut guard = self.lines.lock().expect("memory sink lock");
            std::mem::take(&mut *guard)
        }
    }

    impl LogSink for MemorySink {
        fn write_line(&self, line: &str) {
            self.lines
                .lock()
                .expect("memory sink lock")
                .push(line.to_string());
        }
    }

    #[test]
    fn close_publishes_exactly_one_line() -> Result<(), Box<dyn Error>> {
        let sink = Arc::new(MemorySink::default());
        let clock = Arc::new(ManualClock::new());
        let hooks = JsonLinesMetrics::new(sink.clone());
        let mut recorder = MetricRecorder::new("LoadProfile", clock.clone(), hooks);

        recorder.add_count("Rings", 1.0)?;
        recorder.add_count("Rings", 3.0)?;
        recorder.add_timestamp("Seen", clock.instant())?;
        recorder.start_duration("Fetch")?;
        clock.forward(Duration::from_millis(250));
        recorder.end_duration("Fetch")?;
        assert!(sink.take().is_empty());

        recorder.close()?;
        assert!(recorder.hooks().is_published());

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with('\n'));
        let payload: Value = serde_json::from_str(lines[0].trim())?;
        assert_eq!(payload.get("type"), Some(&Value::from("metrics")));
        assert_eq!(payload.get("operation"), Some(&Value::from("LoadProfile")));
        let start_ms = epoch_millis(recorder.start_time());
        assert_eq!(payload.get("startTimeMs"), Some(&Value::from(start_ms)));
        assert_eq!(payload.get("endTimeMs"), Some(&Value::from(start_ms + 250)));
        assert_eq!(
            payload.pointer("/counts/Rings").and_then(Value::as_f64),
            Some(4.0)
        );
        assert_eq!(payload.pointer("/durationsMs/Fetch"), Some(&Value::from(250)));
        assert_eq!(payload.pointer("/durationsMs/Time"), Some(&Value::from(250)));
        assert_eq!(payload.pointer("/timestampsMs/Seen"), Some(&Value::from(start_ms)));
        assert_eq!(
            payload.pointer("/properties/Operation"),
            Some(&Value::from("LoadProfile"))
        );
        Ok(())
    }

    #[test]
    fn secret_properties_are_redacted_and_base_properties_merge() -> Result<(), Box<dyn Error>> {
        let sink = Arc::new(MemorySink::default());
        let base = Arc::new(BTreeMap::from([
            ("Service".to_string(), "profiles".to_string()),
            ("Region".to_string(), "eu-west-1".to_string()),
        ]));
        let hooks = JsonLinesMetrics::new(sink.clone()).with_base_properties(base);
        let mut recorder = MetricRecorder::new("op", Arc::new(ManualClock::new()), hooks);

        recorder.add_property("SessionToken", "abc123")?;
        recorder.add_property("Region", "us-east-1")?;
        recorder.close()?;

        let lines = sink.take();
        let payload: Value = serde_json::from_str(lines[0].trim())?;
        assert_eq!(
            payload.pointer("/properties/SessionToken"),
            Some(&Value::from(REDACTED))
        );
        assert_eq!(payload.pointer("/properties/Service"), Some(&Value::from("profiles")));
        assert_eq!(payload.pointer("/properties/Region"), Some(&Value::from("us-east-1")));
        Ok(())
    }

    struct DiskFull;

    impl std::io::Write for DiskFull {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_fails_close_and_stays_unpublished() -> Result<(), Box<dyn Error>> {
        let sink = Arc::new(WriterLogSink::new(DiskFull));
        let hooks = JsonLinesMetrics::new(sink);
        let mut recorder = MetricRecorder::new("op", Arc::new(ManualClock::new()), hooks);
        recorder.add_count("Rings", 1.0)?;

        let error = recorder.close().err().ok_or("close should fail")?;
        assert_eq!(error.code, ErrorCode::new("adapters", "metrics_publish_failed"));
        assert!(error.class.is_retriable());
        assert_eq!(error.metadata.get("operation").map(String::as_str), Some("op"));
        assert!(recorder.is_closed());
        assert!(!recorder.hooks().is_published());
        Ok(())
    }
}
