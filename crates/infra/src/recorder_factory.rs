//! Storage strategy selection for configured recorders.

use metric_recorder_adapters::{
    InMemoryMetrics, JsonLinesMetrics, JsonLogger, LogSink, NoopMetrics,
};
use metric_recorder_config::{LoggingLevel, RecorderKind, ValidatedRecorderConfig};
use metric_recorder_core::{MetricRecorder, MetricRecorderFactory};
use metric_recorder_domain::DuplicatePolicy;
use metric_recorder_ports::{CloseContext, Clock, LogLevel, LoggerPort, MetricHooks, log_fields};
use metric_recorder_shared::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Storage strategy handed out by [`ConfiguredRecorderFactory`].
///
/// The variant follows the configured kind, so captured metrics stay
/// readable through [`Self::as_in_memory`].
#[derive(Debug, Clone)]
pub enum ConfiguredMetrics {
    /// Discards everything.
    Noop(NoopMetrics),
    /// Captures for readback after close.
    InMemory(InMemoryMetrics),
    /// Publishes one JSON line on close.
    JsonLines(JsonLinesMetrics),
}

impl ConfiguredMetrics {
    /// Kind this strategy was built for.
    #[must_use]
    pub const fn kind(&self) -> RecorderKind {
        match self {
            Self::Noop(_) => RecorderKind::Noop,
            Self::InMemory(_) => RecorderKind::InMemory,
            Self::JsonLines(_) => RecorderKind::JsonLines,
        }
    }

    /// Capture adapter, when `inMemory` was configured.
    #[must_use]
    pub const fn as_in_memory(&self) -> Option<&InMemoryMetrics> {
        match self {
            Self::InMemory(metrics) => Some(metrics),
            _ => None,
        }
    }

    /// Publishing adapter, when `jsonLines` was configured.
    #[must_use]
    pub const fn as_json_lines(&self) -> Option<&JsonLinesMetrics> {
        match self {
            Self::JsonLines(metrics) => Some(metrics),
            _ => None,
        }
    }

    /// Take the capture adapter out, when `inMemory` was configured.
    pub fn into_in_memory(self) -> std::result::Result<InMemoryMetrics, Self> {
        match self {
            Self::InMemory(metrics) => Ok(metrics),
            other => Err(other),
        }
    }

    fn inner(&mut self) -> &mut dyn MetricHooks {
        match self {
            Self::Noop(metrics) => metrics,
            Self::InMemory(metrics) => metrics,
            Self::JsonLines(metrics) => metrics,
        }
    }
}

impl MetricHooks for ConfiguredMetrics {
    fn on_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.inner().on_property(name, value)
    }

    fn on_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        self.inner().on_timestamp(name, time)
    }

    fn on_count(&mut self, name: &str, value: f64) -> Result<()> {
        self.inner().on_count(name, value)
    }

    fn on_duration(&mut self, name: &str, duration: Duration) -> Result<()> {
        self.inner().on_duration(name, duration)
    }

    fn on_close(&mut self, context: &CloseContext<'_>) -> Result<()> {
        self.inner().on_close(context)
    }
}

/// Factory whose storage strategy is chosen by config at startup.
///
/// Every recorder gets fresh hooks and shares the diagnostics logger.
#[derive(Clone)]
pub struct ConfiguredRecorderFactory {
    kind: RecorderKind,
    policy: DuplicatePolicy,
    base_properties: Arc<BTreeMap<String, String>>,
    sink: Arc<dyn LogSink>,
    logger: Arc<dyn LoggerPort>,
}

impl ConfiguredRecorderFactory {
    /// Selected storage strategy.
    #[must_use]
    pub const fn kind(&self) -> RecorderKind {
        self.kind
    }

    /// Duplicate policy applied by aggregating strategies.
    #[must_use]
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Diagnostics logger attached to every recorder.
    #[must_use]
    pub fn logger(&self) -> Arc<dyn LoggerPort> {
        Arc::clone(&self.logger)
    }

    fn new_hooks(&self) -> ConfiguredMetrics {
        match self.kind {
            RecorderKind::Noop => ConfiguredMetrics::Noop(NoopMetrics),
            RecorderKind::InMemory => {
                ConfiguredMetrics::InMemory(InMemoryMetrics::with_policy(self.policy))
            },
            RecorderKind::JsonLines => ConfiguredMetrics::JsonLines(
                JsonLinesMetrics::new(Arc::clone(&self.sink))
                    .with_base_properties(Arc::clone(&self.base_properties))
                    .with_policy(self.policy),
            ),
        }
    }
}

impl fmt::Debug for ConfiguredRecorderFactory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConfiguredRecorderFactory")
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("base_properties", &self.base_properties)
            .finish_non_exhaustive()
    }
}

impl MetricRecorderFactory for ConfiguredRecorderFactory {
    type Hooks = ConfiguredMetrics;

    fn new_recorder_with_clock(
        &self,
        operation: &str,
        clock: Arc<dyn Clock>,
    ) -> MetricRecorder<ConfiguredMetrics> {
        MetricRecorder::new(operation, clock, self.new_hooks())
            .with_logger(Arc::clone(&self.logger))
    }
}

/// Build a recorder factory from a validated config.
///
/// Metric records and diagnostics share `sink`; diagnostics below the
/// configured level are dropped.
pub fn build_recorder_factory(
    config: &ValidatedRecorderConfig,
    sink: Arc<dyn LogSink>,
) -> ConfiguredRecorderFactory {
    let level = map_log_level(config.logging.level);
    let logger = JsonLogger::new(Arc::clone(&sink))
        .with_min_level(level)
        .with_base_fields(log_fields([("component", "metric-recorder")]));

    tracing::debug!(
        kind = config.kind.as_str(),
        duplicate_policy = config.duplicate_policy.as_str(),
        log_level = level.as_str(),
        base_properties = config.json_lines.base_properties.len(),
        "recorder factory selected"
    );

    ConfiguredRecorderFactory {
        kind: config.kind,
        policy: config.duplicate_policy,
        base_properties: Arc::new(config.json_lines.base_properties.clone()),
        sink,
        logger: Arc::new(logger),
    }
}

const fn map_log_level(level: LoggingLevel) -> LogLevel {
    match level {
        LoggingLevel::Debug => LogLevel::Debug,
        LoggingLevel::Info => LogLevel::Info,
        LoggingLevel::Warn => LogLevel::Warn,
        LoggingLevel::Error => LogLevel::Error,
    }
}
