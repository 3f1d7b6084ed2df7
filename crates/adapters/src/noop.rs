//! Discard adapter.

use metric_recorder_ports::MetricHooks;

/// Hooks that accept and drop everything.
///
/// The recorder still enforces its lifecycle, so misuse such as a double
/// close is reported even though nothing is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopMetrics;

impl MetricHooks for NoopMetrics {}
