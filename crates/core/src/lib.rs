//! # metric-recorder-core
//!
//! The recorder state machine at the center of the workspace.
//!
//! This crate owns the lifecycle rules (open, record, close once) and the
//! close-time bookkeeping. Storage is delegated to a
//! [`MetricHooks`](metric_recorder_ports::MetricHooks) strategy chosen by
//! whoever builds the recorder.
//!
//! ## Features
//!
//! - [`MetricRecorder`] - Operation-scoped recorder with named interval timers
//! - [`MetricRecorderFactory`] - One fresh recorder per operation
//! - [`RecorderGuard`] - Closes a recorder when a scope ends
//! - [`SystemClock`] - Wall-clock time source

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod clock;
pub mod factory;
pub mod guard;
pub mod recorder;

pub use clock::SystemClock;
pub use factory::MetricRecorderFactory;
pub use guard::RecorderGuard;
pub use recorder::MetricRecorder;

/// Returns the core crate version.
#[must_use]
pub const fn core_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
