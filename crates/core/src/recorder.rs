//! The operation-scoped recorder.
//!
//! A [`MetricRecorder`] is created when an operation starts, collects named
//! properties, timestamps, counts, and durations while the operation runs,
//! and is closed exactly once when it finishes. Closing ends any interval
//! still open and emits the standard bookkeeping metrics (see
//! [`StandardMetricName`]) before handing control to the storage hooks.
//!
//! The recorder owns lifecycle validation; the hooks own storage. Every
//! mutation checks state first and only then dispatches, so a rejected call
//! never reaches the hooks.

use metric_recorder_domain::{RecorderState, StandardMetricName, duration_millis};
use metric_recorder_ports::{Clock, CloseContext, LoggerPort, MetricHooks, log_fields};
use metric_recorder_shared::{ErrorEnvelope, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

/// Collects metrics for a single operation and finalizes them on close.
///
/// `H` is the storage strategy. The recorder never stores metric values
/// itself; it only tracks the intervals that are still running.
///
/// # Examples
///
/// ```
/// use metric_recorder_core::{MetricRecorder, SystemClock};
/// use metric_recorder_ports::MetricHooks;
/// use std::sync::Arc;
///
/// struct Discard;
/// impl MetricHooks for Discard {}
///
/// let mut recorder = MetricRecorder::new("LoadProfile", Arc::new(SystemClock), Discard);
/// recorder.add_count("CacheMiss", 1.0)?;
/// recorder.start_duration("Fetch")?;
/// recorder.end_duration("Fetch")?;
/// recorder.close()?;
/// assert!(recorder.is_closed());
/// # Ok::<(), metric_recorder_shared::ErrorEnvelope>(())
/// ```
pub struct MetricRecorder<H> {
    operation: String,
    clock: Arc<dyn Clock>,
    start_time: SystemTime,
    state: RecorderState,
    open_intervals: HashMap<String, SystemTime>,
    hooks: H,
    logger: Option<Arc<dyn LoggerPort>>,
}

impl<H: MetricHooks> MetricRecorder<H> {
    /// Create an open recorder; the start time is read from `clock` now.
    pub fn new(operation: impl Into<String>, clock: Arc<dyn Clock>, hooks: H) -> Self {
        let start_time = clock.now();
        Self {
            operation: operation.into(),
            clock,
            start_time,
            state: RecorderState::Open,
            open_intervals: HashMap::new(),
            hooks,
            logger: None,
        }
    }

    /// Attach a logger for close diagnostics.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn LoggerPort>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Record a string property.
    pub fn add_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.state.ensure_open()?;
        self.hooks.on_property(name, value)
    }

    /// Record a point in time.
    pub fn add_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        self.state.ensure_open()?;
        self.hooks.on_timestamp(name, time)
    }

    /// Record a count. Storage adapters sum repeated names.
    pub fn add_count(&mut self, name: &str, value: f64) -> Result<()> {
        self.state.ensure_open()?;
        self.hooks.on_count(name, value)
    }

    /// Record an elapsed duration. Storage adapters sum repeated names.
    pub fn add_duration(&mut self, name: &str, duration: Duration) -> Result<()> {
        self.state.ensure_open()?;
        self.hooks.on_duration(name, duration)
    }

    /// Start a named interval at the clock's current instant.
    pub fn start_duration(&mut self, name: &str) -> Result<SystemTime> {
        self.state.ensure_open()?;
        let now = self.clock.now();
        self.start_duration_at(name, now)
    }

    /// Start a named interval at `start`.
    ///
    /// Fails when an interval with the same name is already running.
    pub fn start_duration_at(&mut self, name: &str, start: SystemTime) -> Result<SystemTime> {
        self.state.ensure_open()?;
        match self.open_intervals.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(ErrorEnvelope::invalid_state(format!(
                "A timer named {name} is already open."
            ))
            .with_metadata("metric", name)),
            Entry::Vacant(slot) => {
                slot.insert(start);
                Ok(start)
            }
        }
    }

    /// End a named interval at the clock's current instant.
    pub fn end_duration(&mut self, name: &str) -> Result<Duration> {
        self.state.ensure_open()?;
        let now = self.clock.now();
        self.end_duration_at(name, now)
    }

    /// End a named interval at `end` and record its length as a duration.
    ///
    /// Fails when no interval with that name is running, or when `end` lies
    /// before the interval's start. On failure the interval stays open.
    pub fn end_duration_at(&mut self, name: &str, end: SystemTime) -> Result<Duration> {
        self.state.ensure_open()?;
        let Some(&start) = self.open_intervals.get(name) else {
            return Err(
                ErrorEnvelope::invalid_state(format!("No active timer named {name}"))
                    .with_metadata("metric", name),
            );
        };
        let elapsed = end.duration_since(start).map_err(|_| {
            ErrorEnvelope::invalid_state(format!("Timer {name} cannot end before it started."))
                .with_metadata("metric", name)
        })?;
        self.hooks.on_duration(name, elapsed)?;
        self.open_intervals.remove(name);
        Ok(elapsed)
    }

    /// Finalize the recorder.
    ///
    /// Reads the clock once and uses that instant to end every interval
    /// still running, for `EndTime`, and for the total `Time`. The recorder
    /// is closed afterwards even if a hook failed; the first hook error is
    /// returned.
    pub fn close(&mut self) -> Result<()> {
        self.state.ensure_open()?;
        let end_time = self.clock.now();

        let mut pending: Vec<(String, SystemTime)> = self.open_intervals.drain().collect();
        pending.sort_unstable_by(|left, right| left.0.cmp(&right.0));
        let auto_closed = pending.len();

        let outcome = self.finalize(end_time, pending);
        self.state = RecorderState::Closed;

        if let Some(logger) = &self.logger {
            let elapsed = end_time
                .duration_since(self.start_time)
                .unwrap_or_default();
            logger.debug(
                "recorder.closed",
                "metric recorder closed",
                Some(log_fields([
                    ("operation", serde_json::Value::from(self.operation.as_str())),
                    ("autoClosedIntervals", serde_json::Value::from(auto_closed)),
                    ("elapsedMs", serde_json::Value::from(duration_millis(elapsed))),
                    ("ok", serde_json::Value::from(outcome.is_ok())),
                ])),
            );
        }

        outcome
    }

    fn finalize(&mut self, end_time: SystemTime, pending: Vec<(String, SystemTime)>) -> Result<()> {
        for (name, start) in pending {
            // An interval started after the close instant contributes nothing.
            let elapsed = end_time.duration_since(start).unwrap_or_default();
            if let Some(logger) = &self.logger {
                logger.warn(
                    "recorder.interval_auto_closed",
                    "interval was still open at close",
                    Some(log_fields([
                        ("operation", serde_json::Value::from(self.operation.as_str())),
                        ("metric", serde_json::Value::from(name.as_str())),
                        ("elapsedMs", serde_json::Value::from(duration_millis(elapsed))),
                    ])),
                );
            }
            self.hooks.on_duration(&name, elapsed)?;
        }

        self.hooks
            .on_property(StandardMetricName::Operation.as_str(), &self.operation)?;
        self.hooks
            .on_property(StandardMetricName::ThreadName.as_str(), &thread_label())?;
        self.hooks
            .on_timestamp(StandardMetricName::StartTime.as_str(), self.start_time)?;
        self.hooks
            .on_timestamp(StandardMetricName::EndTime.as_str(), end_time)?;
        let total = end_time
            .duration_since(self.start_time)
            .unwrap_or_default();
        self.hooks
            .on_duration(StandardMetricName::Time.as_str(), total)?;

        self.hooks.on_close(&CloseContext {
            operation: &self.operation,
            start_time: self.start_time,
            end_time,
        })
    }

    /// Give back the hooks once the recorder is closed.
    ///
    /// An open recorder is returned unchanged in the error position.
    pub fn into_hooks(self) -> std::result::Result<H, Self> {
        if self.state.is_closed() {
            Ok(self.hooks)
        } else {
            Err(self)
        }
    }
}

impl<H> MetricRecorder<H> {
    /// Operation label.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Instant the recorder was created.
    #[must_use]
    pub const fn start_time(&self) -> SystemTime {
        self.start_time
    }

    /// Time source.
    #[must_use]
    pub const fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Storage hooks.
    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// Whether `close` has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Names of intervals that are running, sorted.
    #[must_use]
    pub fn open_interval_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.open_intervals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn logger(&self) -> Option<&Arc<dyn LoggerPort>> {
        self.logger.as_ref()
    }
}

impl<H: fmt::Debug> fmt::Debug for MetricRecorder<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MetricRecorder")
            .field("operation", &self.operation)
            .field("start_time", &self.start_time)
            .field("state", &self.state)
            .field("open_intervals", &self.open_intervals)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Label for the thread that closes the recorder.
fn thread_label() -> String {
    let current = thread::current();
    current
        .name()
        .map_or_else(|| format!("{:?}", current.id()), str::to_owned)
}
