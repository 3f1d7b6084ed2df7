//! Close-on-drop scope for a recorder.

use crate::recorder::MetricRecorder;
use metric_recorder_ports::{MetricHooks, log_fields};
use std::ops::{Deref, DerefMut};

/// Borrows a recorder and closes it when the guard goes out of scope.
///
/// Early returns through `?` still finalize the operation. A close that
/// fails during drop cannot be propagated, so it is logged through the
/// recorder's logger as `recorder.close_on_drop_failed`.
///
/// ```
/// use metric_recorder_core::{MetricRecorder, RecorderGuard, SystemClock};
/// use metric_recorder_ports::MetricHooks;
/// use std::sync::Arc;
///
/// struct Discard;
/// impl MetricHooks for Discard {}
///
/// let mut recorder = MetricRecorder::new("Checkout", Arc::new(SystemClock), Discard);
/// {
///     let mut scope = RecorderGuard::new(&mut recorder);
///     scope.add_count("Items", 3.0)?;
/// }
/// assert!(recorder.is_closed());
/// # Ok::<(), metric_recorder_shared::ErrorEnvelope>(())
/// ```
#[derive(Debug)]
pub struct RecorderGuard<'a, H: MetricHooks> {
    recorder: &'a mut MetricRecorder<H>,
}

impl<'a, H: MetricHooks> RecorderGuard<'a, H> {
    /// Wrap an open or closed recorder.
    pub const fn new(recorder: &'a mut MetricRecorder<H>) -> Self {
        Self { recorder }
    }
}

impl<H: MetricHooks> Deref for RecorderGuard<'_, H> {
    type Target = MetricRecorder<H>;

    fn deref(&self) -> &Self::Target {
        self.recorder
    }
}

impl<H: MetricHooks> DerefMut for RecorderGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.recorder
    }
}

impl<H: MetricHooks> Drop for RecorderGuard<'_, H> {
    fn drop(&mut self) {
        if self.recorder.is_closed() {
            return;
        }
        if let Err(error) = self.recorder.close()
            && let Some(logger) = self.recorder.logger()
        {
            logger.warn(
                "recorder.close_on_drop_failed",
                "closing the recorder on drop failed",
                Some(log_fields([
                    ("operation", self.recorder.operation().to_owned()),
                    ("code", error.code.to_string()),
                    ("error", error.message),
                ])),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric_recorder_ports::Clock;
    use metric_recorder_shared::Result;
    use metric_recorder_testkit::{CaptureLogger, FailingCloseMetrics, ManualClock, StubMetrics};
    use std::sync::Arc;

    fn record_then_fail(recorder: &mut MetricRecorder<StubMetrics>) -> Result<()> {
        let mut scope = RecorderGuard::new(recorder);
        scope.add_count("Attempts", 1.0)?;
        scope.end_duration("NeverStarted")?;
        scope.add_count("Unreachable", 1.0)
    }

    #[test]
    fn early_return_still_closes() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let mut recorder = MetricRecorder::new("guarded", clock, StubMetrics::new());
        assert!(record_then_fail(&mut recorder).is_err());

        assert!(recorder.is_closed());
        assert_eq!(recorder.hooks().count("Attempts"), Some(1.0));
        assert!(recorder.hooks().count("Unreachable").is_none());
        assert!(recorder.hooks().close_hook_called());
    }

    #[test]
    fn explicit_close_inside_scope_is_not_repeated() -> Result<()> {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let mut recorder = MetricRecorder::new("guarded", clock, StubMetrics::new());
        {
            let mut scope = RecorderGuard::new(&mut recorder);
            scope.close()?;
        }
        assert_eq!(recorder.hooks().close_calls, 1);
        Ok(())
    }

    #[test]
    fn failed_drop_close_is_logged() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
        let logger = CaptureLogger::new();
        let mut recorder = MetricRecorder::new("guarded", clock, FailingCloseMetrics::default())
            .with_logger(Arc::new(logger.clone()));
        drop(RecorderGuard::new(&mut recorder));

        assert!(recorder.is_closed());
        assert_eq!(logger.events_named("recorder.close_on_drop_failed").len(), 1);
    }
}
