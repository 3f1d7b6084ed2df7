//! Logger that keeps events in memory.

use metric_recorder_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use std::sync::{Arc, Mutex};

/// Captures every event, including events logged through children.
#[derive(Debug, Default, Clone)]
pub struct CaptureLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base: LogFields,
}

impl CaptureLogger {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().expect("capture lock").clone()
    }

    /// Captured events with the given name.
    pub fn events_named(&self, name: &str) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|event| &*event.event == name)
            .collect()
    }

    /// Captured events at the given level.
    pub fn events_at(&self, level: LogLevel) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }
}

impl LoggerPort for CaptureLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base.is_empty() {
            let mut merged = self.base.clone();
            merged.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(merged);
        }
        self.events.lock().expect("capture lock").push(event);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base = self.base.clone();
        base.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_ports::log_fields;

    #[test]
    fn child_events_land_in_the_parent_capture() {
        let logger = CaptureLogger::new();
        let child = logger.child(log_fields([("operation", "fetch")]));
        child.info("recorder.closed", "closed", None);

        let events = logger.events_named("recorder.closed");
        assert_eq!(events.len(), 1);
        let operation = events[0]
            .fields
            .as_ref()
            .and_then(|fields| fields.get("operation"));
        assert_eq!(operation, Some(&serde_json::Value::from("fetch")));
    }
}
