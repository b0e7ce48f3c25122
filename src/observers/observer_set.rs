//! # Ordered observer list with panic isolation.
//!
//! Provides [`ObserverSet`], the explicit list of observers a worker notifies.
//!
//! ## Rules
//! - **Registration order**: observers run in the order they were added.
//! - **Synchronous**: `emit()` returns after every observer has returned.
//! - **Isolation**: a panicking observer is caught with `catch_unwind` and
//!   logged; remaining observers still run and the worker loop is unaffected.
//! - **Snapshot**: observers added during `emit()` are notified from the next event on.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

use crate::{error::TaskError, events::WorkerEvent, observers::Observe};

/// Ordered set of observers for one worker.
pub struct ObserverSet<S> {
    observers: RwLock<Vec<Arc<dyn Observe<S>>>>,
}

impl<S: 'static> ObserverSet<S> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Appends an observer.
    pub fn push(&self, observer: Arc<dyn Observe<S>>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every observer, in registration order.
    ///
    /// The list is snapshotted first so observers may subscribe further
    /// observers without deadlocking.
    pub fn emit(&self, event: &WorkerEvent<'_, S>) {
        let snapshot: Vec<Arc<dyn Observe<S>>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for observer in snapshot {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| observer.on_event(event))) {
                let err = TaskError::from_panic(panic_err.as_ref());
                tracing::warn!(
                    worker = %event.id(),
                    observer = observer.name(),
                    event = event.kind.as_label(),
                    error = %err,
                    "observer panicked"
                );
            }
        }
    }
}

impl<S: 'static> Default for ObserverSet<S> {
    fn default() -> Self {
        Self::new()
    }
}
