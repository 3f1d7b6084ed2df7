//! # metric-recorder-infra
//!
//! Composition root: turns a validated config into a recorder factory.
//! This crate depends on `adapters`, `config`, `core`, and `shared`.

/// Config loading helpers used by embedding surfaces.
pub mod config_check;
/// Environment validation helpers used by embedding surfaces.
pub mod env_check;
/// Storage strategy selection helpers.
mod recorder_factory;

pub use config_check::load_effective_config_json;
pub use env_check::{InfraError, InfraResult, validate_env_parsing};
pub use recorder_factory::{ConfiguredMetrics, ConfiguredRecorderFactory, build_recorder_factory};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
