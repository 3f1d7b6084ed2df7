//! # metric-recorder-ports
//!
//! Port traits for the metric-recorder hexagonal architecture.
//!
//! This crate defines the interfaces between the recorder core and its
//! adapters: the time source, the metric storage hooks, and structured
//! logging. It depends only on `domain` and `shared`.

pub mod clock;
pub mod hooks;
pub mod logger;

pub use clock::*;
pub use hooks::*;
pub use logger::*;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Re-export selected domain types used alongside port signatures, so adapter
// crates can implement ports without directly depending on the domain crate.
pub use metric_recorder_domain::{DuplicatePolicy, MetricSnapshot, StandardMetricName};
