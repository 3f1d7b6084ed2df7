//! Duplicate-name handling for single-valued metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a storage adapter does when a property or timestamp name repeats.
///
/// Counts and durations always aggregate and are unaffected. Neither policy
/// ever merges two values: exactly one of them survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePolicy {
    /// Keep the most recent value.
    #[default]
    LastWriteWins,
    /// Refuse the second value with an invalid-state error.
    ///
    /// Standard metric names stay last-write-wins so `close` never fails.
    Reject,
}

impl DuplicatePolicy {
    /// Parse a policy from config/env input (case-insensitive, `-`/`_` tolerant).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "lastwritewins" | "overwrite" => Some(Self::LastWriteWins),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Returns the canonical camelCase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastWriteWins => "lastWriteWins",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
