//! Environment validation helpers for embedding surfaces.

use metric_recorder_config::{RecorderConfig, RecorderEnv, apply_env_overrides};
use metric_recorder_shared::ErrorEnvelope;
use std::collections::BTreeMap;

/// Infra-level error type (shared error envelope).
pub type InfraError = ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

/// Validate that the provided env overrides can be parsed and merged into a config.
pub fn validate_env_parsing(env: &BTreeMap<String, String>) -> InfraResult<()> {
    let parsed = RecorderEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let _ = apply_env_overrides(RecorderConfig::default(), &parsed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_config::ENV_DUPLICATE_POLICY;
    use metric_recorder_shared::ErrorCode;

    #[test]
    fn valid_env_passes() -> InfraResult<()> {
        let env = BTreeMap::from([(ENV_DUPLICATE_POLICY.to_string(), "reject".to_string())]);
        validate_env_parsing(&env)
    }

    #[test]
    fn invalid_env_reports_config_code() {
        let env = BTreeMap::from([(ENV_DUPLICATE_POLICY.to_string(), "merge".to_string())]);
        let error = validate_env_parsing(&env).err();
        assert_eq!(
            error.map(|envelope| envelope.code),
            Some(ErrorCode::new("config", "invalid_env_enum"))
        );
    }
}
