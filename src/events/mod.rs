//! Worker lifecycle events.
//!
//! ## Contents
//! - [`EventKind`], [`WorkerEvent`] event classification and payload
//! - [`ExitReason`] why a worker loop terminated
//!
//! ## Quick reference
//! - **Publisher**: the worker loop (`core::runner`), at its two boundaries only.
//! - **Consumers**: the worker's [`ObserverSet`](crate::ObserverSet), invoked in
//!   registration order from the loop's own task.

mod event;

pub use event::{EventKind, ExitReason, WorkerEvent};
