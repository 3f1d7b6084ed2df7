//! # metric-recorder-domain
//!
//! Value objects shared by the recorder core and its storage adapters.
//!
//! - **Names** - `StandardMetricName`, the stable identifiers emitted on close
//! - **Policy** - `DuplicatePolicy` for repeated property/timestamp names
//! - **State** - `RecorderState`, the open/closed lifecycle
//! - **Snapshot** - `MetricSnapshot`, a read-only copy of captured metrics
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use metric_recorder_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod names;
pub mod policy;
pub mod snapshot;
pub mod states;

pub use names::StandardMetricName;
pub use policy::DuplicatePolicy;
pub use snapshot::{MetricSnapshot, duration_millis, epoch_millis};
pub use states::RecorderState;

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================
