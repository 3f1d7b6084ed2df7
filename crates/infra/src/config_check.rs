//! Effective config rendering for embedding surfaces.

use crate::InfraResult;
use metric_recorder_config::{RecorderEnv, load_recorder_config_from_path, to_pretty_json};
use metric_recorder_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;

/// Load and validate the effective config, returning deterministic pretty JSON.
pub fn load_effective_config_json(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> InfraResult<String> {
    let env = RecorderEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let config = load_recorder_config_from_path(config_path, overrides_json, &env)?;
    to_pretty_json(&config)
}
