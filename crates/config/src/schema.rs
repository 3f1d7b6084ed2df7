//! Recorder configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims base property keys so lookups are stable.

use metric_recorder_domain::{DuplicatePolicy, StandardMetricName};
use metric_recorder_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Maximum number of `jsonLines.baseProperties` entries.
pub const BASE_PROPERTIES_MAX: usize = 64;

const BASE_PROPERTY_KEY_MAX_LEN: usize = 128;

/// Storage strategy a configured factory hands to each recorder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecorderKind {
    /// Discard every metric.
    #[default]
    Noop,
    /// Capture metrics in memory for readback after close.
    InMemory,
    /// Publish one JSON line per closed recorder.
    JsonLines,
}

impl RecorderKind {
    /// Parse a kind from config/env input (case-insensitive, `-`/`_` tolerant).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "noop" | "none" => Some(Self::Noop),
            "inmemory" | "memory" => Some(Self::InMemory),
            "jsonlines" | "jsonl" => Some(Self::JsonLines),
            _ => None,
        }
    }

    /// Returns the canonical camelCase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::InMemory => "inMemory",
            Self::JsonLines => "jsonLines",
        }
    }
}

impl fmt::Display for RecorderKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Minimum level for recorder diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    /// Everything, including per-close summaries.
    Debug,
    /// Informational and above.
    #[default]
    Info,
    /// Warnings (such as auto-closed intervals) and errors.
    Warn,
    /// Errors only.
    Error,
}

impl LoggingLevel {
    /// Parse a level name (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Lowercase level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Top-level recorder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RecorderConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Storage strategy.
    pub kind: RecorderKind,
    /// Handling of repeated property/timestamp names.
    pub duplicate_policy: DuplicatePolicy,
    /// JSON lines publishing settings.
    pub json_lines: JsonLinesConfig,
    /// Diagnostics settings.
    pub logging: LoggingConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            kind: RecorderKind::default(),
            duplicate_policy: DuplicatePolicy::default(),
            json_lines: JsonLinesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedRecorderConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.json_lines.normalize_and_validate()?;
        Ok(ValidatedRecorderConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// JSON lines publishing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct JsonLinesConfig {
    /// Properties attached to every published record.
    pub base_properties: BTreeMap<String, String>,
}

impl JsonLinesConfig {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        let mut normalized = BTreeMap::new();
        for (raw_key, value) in std::mem::take(&mut self.base_properties) {
            let key = raw_key.trim();
            if key.is_empty() {
                return Err(ConfigSchemaError::InvalidBaseProperty {
                    key: raw_key,
                    reason: "key must be non-empty",
                });
            }
            if key.len() > BASE_PROPERTY_KEY_MAX_LEN {
                return Err(ConfigSchemaError::InvalidBaseProperty {
                    key: raw_key,
                    reason: "key is too long",
                });
            }
            if StandardMetricName::is_standard(key) {
                return Err(ConfigSchemaError::InvalidBaseProperty {
                    key: raw_key,
                    reason: "key is reserved for a standard metric",
                });
            }
            if normalized.insert(key.to_owned(), value).is_some() {
                return Err(ConfigSchemaError::InvalidBaseProperty {
                    key: raw_key,
                    reason: "key is duplicated after trimming",
                });
            }
        }

        if normalized.len() > BASE_PROPERTIES_MAX {
            return Err(ConfigSchemaError::ListTooLarge {
                section: "jsonLines",
                field: "baseProperties",
                len: normalized.len(),
                max: BASE_PROPERTIES_MAX,
            });
        }

        self.base_properties = normalized;
        Ok(())
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Minimum emitted level.
    pub level: LoggingLevel,
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecorderConfig {
    raw: RecorderConfig,
}

impl ValidatedRecorderConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &RecorderConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> RecorderConfig {
        self.raw
    }
}

impl AsRef<RecorderConfig> for ValidatedRecorderConfig {
    fn as_ref(&self) -> &RecorderConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedRecorderConfig {
    type Target = RecorderConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a recorder config from a JSON string, applying validation and normalization.
pub fn parse_recorder_config_json(input: &str) -> Result<ValidatedRecorderConfig, ErrorEnvelope> {
    let config: RecorderConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a recorder config from a TOML string, applying validation and normalization.
pub fn parse_recorder_config_toml(input: &str) -> Result<ValidatedRecorderConfig, ErrorEnvelope> {
    let config: RecorderConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Typed schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this crate.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A map or list field exceeds the maximum allowed size.
    ListTooLarge {
        /// Schema section (e.g. `jsonLines`).
        section: &'static str,
        /// Field name in the config file (e.g. `baseProperties`).
        field: &'static str,
        /// Number of entries after normalization.
        len: usize,
        /// Maximum allowed number of entries.
        max: usize,
    },
    /// A base property key is unusable.
    InvalidBaseProperty {
        /// Key as written in the config.
        key: String,
        /// Why it was refused.
        reason: &'static str,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::ListTooLarge { .. } => ErrorCode::new("config", "list_too_large"),
            Self::InvalidBaseProperty { .. } => ErrorCode::new("config", "invalid_base_property"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::ListTooLarge {
                section,
                field,
                len,
                max,
            } => write!(
                formatter,
                "{section}.{field} is too large ({len} entries, max {max})"
            ),
            Self::InvalidBaseProperty { key, reason } => {
                write!(formatter, "jsonLines.baseProperties[{key:?}]: {reason}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => {
                envelope = envelope
                    .with_metadata("found", found.to_string())
                    .with_metadata("supported", supported.to_string());
            },
            ConfigSchemaError::ListTooLarge {
                section,
                field,
                len,
                max,
            } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
            ConfigSchemaError::InvalidBaseProperty { key, reason } => {
                envelope = envelope
                    .with_metadata("key", key)
                    .with_metadata("reason", reason);
            },
        }

        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() -> Result<(), ConfigSchemaError> {
        let config = RecorderConfig::default().validate_and_normalize()?;
        assert_eq!(config.version, CURRENT_CONFIG_VERSION);
        assert_eq!(config.kind, RecorderKind::Noop);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWriteWins);
        assert_eq!(config.logging.level, LoggingLevel::Info);
        Ok(())
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let config = RecorderConfig {
            version: 2,
            ..RecorderConfig::default()
        };
        let error = config.validate_and_normalize().err();
        assert_eq!(
            error,
            Some(ConfigSchemaError::UnsupportedVersion {
                found: 2,
                supported: CURRENT_CONFIG_VERSION
            })
        );
    }

    #[test]
    fn base_property_keys_are_trimmed() -> Result<(), ConfigSchemaError> {
        let mut config = RecorderConfig::default();
        config
            .json_lines
            .base_properties
            .insert("  Service ".into(), "profiles".into());
        let validated = config.validate_and_normalize()?;
        assert_eq!(
            validated.json_lines.base_properties.get("Service").map(String::as_str),
            Some("profiles")
        );
        Ok(())
    }

    #[test]
    fn reserved_and_blank_keys_are_rejected() {
        for key in ["Operation", "   ", "Time"] {
            let mut config = RecorderConfig::default();
            config
                .json_lines
                .base_properties
                .insert(key.into(), "value".into());
            let error = config.validate_and_normalize().err();
            assert!(
                matches!(error, Some(ConfigSchemaError::InvalidBaseProperty { .. })),
                "{key:?} should be refused"
            );
        }
    }

    #[test]
    fn trimmed_collisions_are_rejected() {
        let mut config = RecorderConfig::default();
        config
            .json_lines
            .base_properties
            .insert("Region".into(), "a".into());
        config
            .json_lines
            .base_properties
            .insert(" Region".into(), "b".into());
        assert!(config.validate_and_normalize().is_err());
    }

    #[test]
    fn too_many_base_properties_are_rejected() {
        let mut config = RecorderConfig::default();
        for index in 0..=BASE_PROPERTIES_MAX {
            config
                .json_lines
                .base_properties
                .insert(format!("Key{index}"), "v".into());
        }
        let error = config.validate_and_normalize().err();
        assert!(matches!(
            error,
            Some(ConfigSchemaError::ListTooLarge { len, max, .. }) if len == max + 1
        ));
    }

    #[test]
    fn schema_error_maps_to_envelope_with_metadata() {
        let envelope = ErrorEnvelope::from(ConfigSchemaError::UnsupportedVersion {
            found: 9,
            supported: 1,
        });
        assert_eq!(envelope.code, ErrorCode::new("config", "unsupported_version"));
        assert_eq!(envelope.metadata.get("found").map(String::as_str), Some("9"));
    }

    #[test]
    fn kind_parsing_accepts_aliases() {
        assert_eq!(RecorderKind::parse("in_memory"), Some(RecorderKind::InMemory));
        assert_eq!(RecorderKind::parse("JSON-LINES"), Some(RecorderKind::JsonLines));
        assert_eq!(RecorderKind::parse("none"), Some(RecorderKind::Noop));
        assert_eq!(RecorderKind::parse("statsd"), None);
        assert_eq!(RecorderKind::InMemory.to_string(), "inMemory");
    }
}
