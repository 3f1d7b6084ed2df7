//! Metric storage boundary contract.
//!
//! A recorder validates its own lifecycle and then hands every accepted
//! recording to a [`MetricHooks`] strategy it owns. Strategies decide what to
//! keep: capture everything for assertions, discard everything, or publish on
//! close. Every hook defaults to a no-op, so a strategy only implements the
//! kinds it cares about.

use metric_recorder_shared::Result;
use std::time::{Duration, SystemTime};

/// Facts about the operation handed to the finalize hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseContext<'a> {
    /// Operation label the recorder was created with.
    pub operation: &'a str,
    /// Instant the recorder was created.
    pub start_time: SystemTime,
    /// Instant `close` read from the clock.
    pub end_time: SystemTime,
}

/// Storage strategy behind a metric recorder.
///
/// The recorder guarantees hooks are only invoked while it is open, and that
/// `on_close` runs exactly once, after the standard metrics were dispatched.
pub trait MetricHooks {
    /// A string property was recorded.
    ///
    /// When `name` repeats, exactly one value may survive; never merge.
    fn on_property(&mut self, _name: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    /// A timestamp was recorded. Same single-value contract as properties.
    fn on_timestamp(&mut self, _name: &str, _time: SystemTime) -> Result<()> {
        Ok(())
    }

    /// A count was recorded. Repeated names are expected to sum.
    fn on_count(&mut self, _name: &str, _value: f64) -> Result<()> {
        Ok(())
    }

    /// A duration was recorded. Repeated names are expected to sum.
    fn on_duration(&mut self, _name: &str, _duration: Duration) -> Result<()> {
        Ok(())
    }

    /// The recorder is closing; store, publish, or flush here.
    fn on_close(&mut self, _context: &CloseContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl<H: MetricHooks + ?Sized> MetricHooks for Box<H> {
    fn on_property(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).on_property(name, value)
    }

    fn on_timestamp(&mut self, name: &str, time: SystemTime) -> Result<()> {
        (**self).on_timestamp(name, time)
    }

    fn on_count(&mut self, name: &str, value: f64) -> Result<()> {
        (**self).on_count(name, value)
    }

    fn on_duration(&mut self, name: &str, duration: Duration) -> Result<()> {
        (**self).on_duration(name, duration)
    }

    fn on_close(&mut self, context: &CloseContext<'_>) -> Result<()> {
        (**self).on_close(context)
    }
}
