//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present must hold a valid,
//! non-empty value, otherwise loading fails instead of silently falling back.

use crate::schema::{LoggingLevel, RecorderConfig, RecorderKind, ValidatedRecorderConfig};
use metric_recorder_domain::DuplicatePolicy;
use metric_recorder_shared::{ErrorCode, ErrorEnvelope, redact_if_secret};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: storage strategy (`noop`, `inMemory`, `jsonLines`).
pub const ENV_RECORDER_KIND: &str = "MR_RECORDER_KIND";
/// Env var: duplicate policy (`lastWriteWins`, `reject`).
pub const ENV_DUPLICATE_POLICY: &str = "MR_DUPLICATE_POLICY";
/// Env var: minimum diagnostics level.
pub const ENV_LOG_LEVEL: &str = "MR_LOG_LEVEL";

const ENV_VARS: [&str; 3] = [ENV_RECORDER_KIND, ENV_DUPLICATE_POLICY, ENV_LOG_LEVEL];

/// Parsed env overrides; `None` means the variable was not set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderEnv {
    /// `MR_RECORDER_KIND`.
    pub kind: Option<RecorderKind>,
    /// `MR_DUPLICATE_POLICY`.
    pub duplicate_policy: Option<DuplicatePolicy>,
    /// `MR_LOG_LEVEL`.
    pub log_level: Option<LoggingLevel>,
}

impl RecorderEnv {
    /// Parse from an explicit variable map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            kind: parse_optional_enum(map, ENV_RECORDER_KIND, RecorderKind::parse)?,
            duplicate_policy: parse_optional_enum(
                map,
                ENV_DUPLICATE_POLICY,
                DuplicatePolicy::parse,
            )?,
            log_level: parse_optional_enum(map, ENV_LOG_LEVEL, LoggingLevel::parse)?,
        })
    }

    /// Parse from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none() && self.duplicate_policy.is_none() && self.log_level.is_none()
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: RecorderConfig,
    env: &RecorderEnv,
) -> Result<ValidatedRecorderConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(kind) = env.kind {
        config.kind = kind;
    }
    if let Some(policy) = env.duplicate_policy {
        config.duplicate_policy = policy;
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }

    config.validate_and_normalize().map_err(Into::into)
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    parse(trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_owned(),
        })
}

/// Typed env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => {
                envelope = envelope.with_metadata("env_var", var);
            },
            EnvParseError::InvalidEnum { var, value } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", redact_if_secret(var, &value));
            },
        }

        envelope
    }
}
