//! Result alias for shared error handling.

use crate::errors::ErrorEnvelope;

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Fail with an invalid-state error unless `condition` holds.
///
/// # Examples
///
/// ```
/// use metric_recorder_shared::ensure_state;
///
/// assert!(ensure_state(true, "unused").is_ok());
/// assert!(ensure_state(false, "MetricRecorder is already closed.").is_err());
/// ```
pub fn ensure_state(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ErrorEnvelope::invalid_state(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_state_maps_false_to_invalid_state() {
        let result = ensure_state(false, "Metrics should only be retrieved after close.");
        assert!(matches!(result, Err(ref error) if error.is_invalid_state()));
        assert!(ensure_state(true, "never shown").is_ok());
    }
}
