//! # metric-recorder-config
//!
//! Configuration schema, validation, and loading for configured recorder
//! factories. This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use schema::{
    BASE_PROPERTIES_MAX, CURRENT_CONFIG_VERSION, ConfigSchemaError, JsonLinesConfig,
    LoggingConfig, LoggingLevel, RecorderConfig, RecorderKind, ValidatedRecorderConfig,
    parse_recorder_config_json, parse_recorder_config_toml,
};

pub use env::{
    ENV_DUPLICATE_POLICY, ENV_LOG_LEVEL, ENV_RECORDER_KIND, EnvParseError, RecorderEnv,
    apply_env_overrides,
};
pub use load::{
    load_recorder_config_from_path, load_recorder_config_from_sources,
    load_recorder_config_std_env, to_pretty_json, to_pretty_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_domain::domain_crate_version;
    use metric_recorder_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_domain_and_shared() {
        let domain_version = domain_crate_version();
        let shared_version = shared_crate_version();

        assert!(!domain_version.is_empty());
        assert!(!shared_version.is_empty());
    }
}
