//! # Observer: user-facing lifecycle handlers
//!
//! The [`Observe`] trait is the extension point for reacting to a worker's
//! `Started` / `Stopped` boundaries. Observers are invoked **synchronously**, in
//! registration order, from inside the worker loop's own task.
//!
//! ```text
//! worker loop ── WorkerEvent ──► ObserverSet::emit()
//!                                   ├─► observer 1 .on_event(&ev)
//!                                   ├─► observer 2 .on_event(&ev)
//!                                   └─► observer N .on_event(&ev)
//! ```
//!
//! ## Rules
//! - Observers must return promptly: the loop waits for them at its boundaries.
//! - A panic inside an observer is caught and logged; later observers still run.
//! - The event borrows the worker's state; nothing may be retained past the call.
//!
//! # Example: custom observer
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tinyworkers::{EventKind, Observe, WorkerEvent};
//!
//! #[derive(Default)]
//! struct StopCounter(AtomicUsize);
//!
//! impl<S: 'static> Observe<S> for StopCounter {
//!     fn on_event(&self, event: &WorkerEvent<'_, S>) {
//!         if event.kind == EventKind::Stopped {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "stop-counter" }
//! }
//! ```

use crate::events::{EventKind, WorkerEvent};

/// Lifecycle observer for a worker with state `S`.
pub trait Observe<S>: Send + Sync + 'static {
    /// Handles a single lifecycle event.
    ///
    /// Called from the worker loop; keep it short and non-blocking.
    fn on_event(&self, event: &WorkerEvent<'_, S>);

    /// Returns the observer name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed observer, optionally restricted to one [`EventKind`].
pub struct ObserverFn<F> {
    kind: Option<EventKind>,
    f: F,
}

impl<F> ObserverFn<F> {
    /// Observer receiving every event.
    pub fn new(f: F) -> Self {
        Self { kind: None, f }
    }

    /// Observer receiving only events of `kind`.
    pub fn only(kind: EventKind, f: F) -> Self {
        Self {
            kind: Some(kind),
            f,
        }
    }
}

impl<S, F> Observe<S> for ObserverFn<F>
where
    S: 'static,
    F: Fn(&WorkerEvent<'_, S>) + Send + Sync + 'static,
{
    fn on_event(&self, event: &WorkerEvent<'_, S>) {
        match self.kind {
            Some(kind) if kind != event.kind => {}
            _ => (self.f)(event),
        }
    }

    fn name(&self) -> &'static str {
        match self.kind {
            Some(EventKind::Started) => "on_started",
            Some(EventKind::Stopped) => "on_stopped",
            None => "on_event",
        }
    }
}
