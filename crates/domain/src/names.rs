//! Standard metric names emitted by every recorder on close.
//!
//! The string forms are stable identifiers: downstream consumers and tests
//! assert on them verbatim, so they must never change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric names recorded by `close` on every recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardMetricName {
    /// Property: the operation label given at construction.
    Operation,
    /// Property: the name (or id) of the thread that closed the recorder.
    ThreadName,
    /// Timestamp: the instant the recorder was created.
    StartTime,
    /// Timestamp: the instant the recorder was closed.
    EndTime,
    /// Duration: total time between creation and close.
    Time,
}

impl StandardMetricName {
    /// Every standard name, in emission order.
    pub const ALL: [Self; 5] = [
        Self::Operation,
        Self::ThreadName,
        Self::StartTime,
        Self::EndTime,
        Self::Time,
    ];

    /// Returns the stable string identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operation => "Operation",
            Self::ThreadName => "ThreadName",
            Self::StartTime => "StartTime",
            Self::EndTime => "EndTime",
            Self::Time => "Time",
        }
    }

    /// Look up a standard name by its exact identifier.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == value)
    }

    /// Returns true when `value` is exactly one of the standard identifiers.
    #[must_use]
    pub fn is_standard(value: &str) -> bool {
        Self::parse(value).is_some()
    }
}

impl fmt::Display for StandardMetricName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl AsRef<str> for StandardMetricName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
