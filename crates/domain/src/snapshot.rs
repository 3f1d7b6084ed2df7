//! Read-only copies of captured metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Everything a capturing adapter recorded for one operation.
///
/// Maps are ordered so snapshots compare and serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Operation label, once the recorder has been closed.
    pub operation: Option<String>,
    /// Single-valued string properties.
    pub properties: BTreeMap<String, String>,
    /// Single-valued timestamps.
    pub timestamps: BTreeMap<String, SystemTime>,
    /// Summed counts.
    pub counts: BTreeMap<String, f64>,
    /// Summed durations.
    pub durations: BTreeMap<String, Duration>,
}

impl MetricSnapshot {
    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.timestamps.is_empty()
            && self.counts.is_empty()
            && self.durations.is_empty()
    }

    /// Total number of named metrics across every kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len() + self.timestamps.len() + self.counts.len() + self.durations.len()
    }
}

/// Milliseconds since the Unix epoch, saturating at zero for earlier instants.
#[must_use]
pub fn epoch_millis(instant: SystemTime) -> u64 {
    instant
        .duration_since(UNIX_EPOCH)
        .ok()
        .map_or(0, duration_millis)
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_reports_empty() {
        let snapshot = MetricSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }

    #[test]
    fn len_counts_every_kind() {
        let mut snapshot = MetricSnapshot::default();
        snapshot
            .properties
            .insert("StarshipName".into(), "Voyager".into());
        snapshot.counts.insert("Rings".into(), 20.0);
        snapshot
            .durations
            .insert("Time".into(), Duration::from_millis(200));
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn epoch_millis_handles_pre_epoch_instants() {
        let later = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(epoch_millis(later), 1_500);

        let earlier = UNIX_EPOCH
            .checked_sub(Duration::from_secs(1))
            .unwrap_or(UNIX_EPOCH);
        assert_eq!(epoch_millis(earlier), 0);
    }
}
