//! Recorder lifecycle state machine.

use metric_recorder_shared::{Result, ensure_state};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a metric recorder.
///
/// `Open` is initial, `Closed` is terminal. There is no way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    /// Accepting recordings.
    #[default]
    Open,
    /// Finalized; read-only.
    Closed,
}

impl RecorderState {
    /// Returns true once the terminal state is reached.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Fail with invalid-state unless the recorder is still open.
    pub fn ensure_open(self) -> Result<()> {
        ensure_state(!self.is_closed(), "MetricRecorder is already closed.")
    }

    /// Fail with invalid-state unless the recorder is closed.
    pub fn ensure_closed(self) -> Result<()> {
        ensure_state(
            self.is_closed(),
            "Metrics should only be retrieved after the recorder is closed.",
        )
    }
}
