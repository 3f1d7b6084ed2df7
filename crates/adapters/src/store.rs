//! Aggregating metric maps shared by the storing adapters.

use metric_recorder_domain::{DuplicatePolicy, MetricSnapshot, StandardMetricName};
use metric_recorder_shared::{ErrorEnvelope, Result};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Per-kind maps with the aggregation rules applied on insert.
///
/// Properties and timestamps keep one value per name (subject to the
/// [`DuplicatePolicy`]); counts and durations sum.
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    policy: DuplicatePolicy,
    pub(crate) properties: HashMap<String, String>,
    pub(crate) timestamps: HashMap<String, SystemTime>,
    pub(crate) counts: HashMap<String, f64>,
    pub(crate) durations: HashMap<String, Duration>,
}

impl MetricStore {
    /// Create an empty store with the given duplicate policy.
    #[must_use]
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Active duplicate policy.
    #[must_use]
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub(crate) fn put_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.check_duplicate(name, "property", self.properties.contains_key(name))?;
        self.properties.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    pub(crate) fn put_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        self.check_duplicate(name, "timestamp", self.timestamps.contains_key(name))?;
        self.timestamps.insert(name.to_owned(), time);
        Ok(())
    }

    pub(crate) fn add_count(&mut self, name: &str, value: f64) {
        *self.counts.entry(name.to_owned()).or_insert(0.0) += value;
    }

    pub(crate) fn add_duration(&mut self, name: &str, duration: Duration) {
        let total = self.durations.entry(name.to_owned()).or_default();
        *total = total.saturating_add(duration);
    }

    fn check_duplicate(&self, name: &str, kind: &str, exists: bool) -> Result<()> {
        if exists && self.policy == DuplicatePolicy::Reject && !StandardMetricName::is_standard(name)
        {
            return Err(ErrorEnvelope::invalid_state(format!(
                "A {kind} named {name} was already recorded."
            ))
            .with_metadata("metric", name)
            .with_metadata("policy", self.policy.as_str()));
        }
        Ok(())
    }

    /// Ordered copy of every map.
    #[must_use]
    pub fn to_snapshot(&self, operation: Option<String>) -> MetricSnapshot {
        MetricSnapshot {
            operation,
            properties: self
                .properties
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            timestamps: self
                .timestamps
                .iter()
                .map(|(name, time)| (name.clone(), *time))
                .collect(),
            counts: self
                .counts
                .iter()
                .map(|(name, value)| (name.clone(), *value))
                .collect(),
            durations: self
                .durations
                .iter()
                .map(|(name, duration)| (name.clone(), *duration))
                .collect(),
        }
    }
}
