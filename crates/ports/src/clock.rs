//! Time source boundary contract.

use std::sync::Arc;
use std::time::SystemTime;

/// Source of the current instant for a recorder.
///
/// Production code uses the wall clock; tests inject a clock that only moves
/// when told to.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> SystemTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}
