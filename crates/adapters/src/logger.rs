//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use metric_recorder_core::SystemClock;
use metric_recorder_domain::epoch_millis;
use metric_recorder_ports::{Clock, LogEvent, LogFields, LogLevel, LoggerPort};
use metric_recorder_shared::redaction::{REDACTED, is_secret_key};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// JSON logger emitting one line per event.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            clock: Arc::new(SystemClock),
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Stamp events from `clock` instead of the wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Minimum level that reaches the sink.
    #[must_use]
    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl fmt::Debug for JsonLogger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JsonLogger")
            .field("base_fields", &self.base_fields)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        let mut fields = self.base_fields.clone();
        if let Some(extra) = event.fields {
            fields.extend(extra);
        }

        let mut payload = serde_json::Map::new();
        payload.insert(
            "timestampMs".to_string(),
            Value::from(epoch_millis(self.clock.now())),
        );
        payload.insert("level".to_string(), Value::from(event.level.as_str()));
        payload.insert("event".to_string(), Value::from(&*event.event));
        payload.insert("message".to_string(), Value::from(&*event.message));
        if !fields.is_empty() {
            payload.insert("fields".to_string(), redacted_object(fields));
        }

        let line = serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        );
        self.sink.write_line(&line);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            base_fields: merged,
            ..self.clone()
        })
    }
}

fn redacted_object(fields: LogFields) -> Value {
    let map = fields
        .into_iter()
        .map(|(key, mut value)| {
            if is_secret_key(&key) {
                value = Value::from(REDACTED);
            } else {
                redact_value(&mut value);
            }
            (key.into_string(), value)
        })
        .collect();
    Value::Object(map)
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if is_secret_key(key) {
                    *nested = Value::from(REDACTED);
                } else {
                    redact_value(nested);
                }
            }
        },
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_ports::log_fields;
    use metric_recorder_testkit::ManualClock;
    use serde_json::json;
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
            let mut guard = self.lines.lock().expect("memory sink lock");
            guard.push(line.to_string());
        }
    }

    #[test]
    fn json_logger_redacts_sensitive_fields() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemorySink::default());
        let logger = JsonLogger::new(sink.clone()).with_min_level(LogLevel::Debug);

        let fields = log_fields([
            ("apiKey", json!("secret")),
            ("safe", json!("ok")),
            ("context", json!({ "password": "nope", "attempt": 7 })), // pragma: allowlist secret
        ]);
        logger.info("test.event", "testing", Some(fields));

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        let payload: Value = serde_json::from_str(lines[0].trim())?;
        let fields = payload
            .get("fields")
            .and_then(Value::as_object)
            .ok_or("missing fields")?;
        assert_eq!(fields.get("apiKey"), Some(&Value::from(REDACTED)));
        assert_eq!(fields.get("safe"), Some(&Value::from("ok")));
        assert_eq!(
            payload.pointer("/fields/context/password"),
            Some(&Value::from(REDACTED))
        );
        assert_eq!(payload.pointer("/fields/context/attempt"), Some(&Value::from(7)));
        Ok(())
    }

    #[test]
    fn events_below_min_level_are_dropped() {
        let sink = Arc::new(MemorySink::default());
        let logger = JsonLogger::new(sink.clone()).with_min_level(LogLevel::Warn);
        logger.debug("recorder.closed", "closed", None);
        logger.info("recorder.closed", "closed", None);
        logger.warn("recorder.interval_auto_closed", "auto closed", None);

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("recorder.interval_auto_closed"));
    }

    #[test]
    fn child_logger_merges_fields() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(MemorySink::default());
        let clock = Arc::new(ManualClock::new());
        let logger = JsonLogger::new(sink.clone())
            .with_min_level(LogLevel::Debug)
            .with_clock(clock.clone())
            .with_base_fields(log_fields([("component", "recorder")]));

        let child = logger.child(log_fields([("operation", "LoadProfile")]));
        child.info("test.child", "child log", None);

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        let payload: Value = serde_json::from_str(lines[0].trim())?;
        assert_eq!(payload.pointer("/fields/component"), Some(&Value::from("recorder")));
        assert_eq!(
            payload.pointer("/fields/operation"),
            Some(&Value::from("LoadProfile"))
        );
        assert_eq!(
            payload.get("timestampMs"),
            Some(&Value::from(epoch_millis(clock.instant())))
        );
        assert_eq!(payload.get("level"), Some(&Value::from("info")));
        Ok(())
    }
}
