//! Config loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{
    LoggingLevel, RecorderConfig, RecorderEnv, RecorderKind, ValidatedRecorderConfig,
    apply_env_overrides,
};
use metric_recorder_domain::DuplicatePolicy;
use metric_recorder_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the recorder config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`RecorderEnv`)
/// - overrides JSON (partial config)
/// - config JSON (file content)
/// - defaults (`RecorderConfig::default()`)
pub fn load_recorder_config_from_sources(
    config_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &RecorderEnv,
) -> Result<ValidatedRecorderConfig, ErrorEnvelope> {
    let mut config = match config_json {
        None => RecorderConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut config, overrides);
    }

    // env is applied last and also validates/normalizes the resulting config.
    let validated = apply_env_overrides(config, env)?;
    tracing::debug!(
        kind = validated.kind.as_str(),
        duplicate_policy = validated.duplicate_policy.as_str(),
        "recorder config loaded"
    );
    Ok(validated)
}

/// Load the recorder config from an optional file path.
///
/// The extension picks the format: `.toml` is TOML, `.json` or none is JSON.
pub fn load_recorder_config_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &RecorderEnv,
) -> Result<ValidatedRecorderConfig, ErrorEnvelope> {
    let mut config = match config_path {
        None => RecorderConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            parse_config_unvalidated(&config_text, format)?
        },
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut config, overrides);
    }

    // env is applied last and also validates/normalizes the resulting config.
    let validated = apply_env_overrides(config, env)?;
    tracing::debug!(
        path = config_path.map(|path| path.display().to_string()),
        kind = validated.kind.as_str(),
        "recorder config loaded"
    );
    Ok(validated)
}

/// Load the recorder config from std env and an optional file path.
pub fn load_recorder_config_std_env(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedRecorderConfig, ErrorEnvelope> {
    let env = RecorderEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_recorder_config_from_path(config_path, overrides_json, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &RecorderConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &RecorderConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<RecorderConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<RecorderConfigOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

/// Partial config: every present field replaces the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct RecorderConfigOverrides {
    version: Option<u32>,
    kind: Option<RecorderKind>,
    duplicate_policy: Option<DuplicatePolicy>,
    json_lines: JsonLinesOverrides,
    logging: LoggingOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct JsonLinesOverrides {
    base_properties: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct LoggingOverrides {
    level: Option<LoggingLevel>,
}

fn apply_overrides(config: &mut RecorderConfig, overrides: RecorderConfigOverrides) {
    if let Some(version) = overrides.version {
        config.version = version;
    }
    if let Some(kind) = overrides.kind {
        config.kind = kind;
    }
    if let Some(policy) = overrides.duplicate_policy {
        config.duplicate_policy = policy;
    }
    if let Some(base) = overrides.json_lines.base_properties {
        config.json_lines.base_properties = base;
    }
    if let Some(level) = overrides.logging.level {
        config.logging.level = level;
    }
}
