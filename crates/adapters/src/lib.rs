//! # metric-recorder-adapters
//!
//! Storage strategies for the recorder (capture, discard, JSON lines), the
//! factories that wire them to fresh recorders, and the structured JSON
//! logger with its sinks.
//! This crate depends on `core`, `ports`, `domain`, and `shared`.

pub mod factories;
pub mod in_memory;
pub mod json_lines;
pub mod log_sink;
pub mod logger;
pub mod noop;
pub mod store;

pub use factories::{
    InMemoryMetricRecorderFactory, JsonLinesMetricRecorderFactory, NoopMetricRecorderFactory,
};
pub use in_memory::InMemoryMetrics;
pub use json_lines::{JsonLinesMetrics, METRICS_RECORD_TYPE};
pub use log_sink::{LogSink, StderrLogSink, WriterLogSink};
pub use logger::JsonLogger;
pub use noop::NoopMetrics;
pub use store::MetricStore;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
