//! # Job abstraction.
//!
//! A [`Job`] is the unit of work a worker performs: the **action** executed once
//! per cycle, or the **wait** callback executed between cycles. Each call receives
//! the owning [`Worker`] handle and exclusive access to the worker's state.
//!
//! The common handle type is [`JobRef`], an `Arc<dyn Job<S>>` shared by every
//! worker a [`Factory`](crate::Factory) creates.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{core::Worker, error::TaskError};

/// # Asynchronous unit of work run against per-worker state.
///
/// Jobs are stateless with respect to which worker invokes them: all per-worker
/// data lives in `state`. The `&mut S` borrow lasts for this call only.
///
/// A call is never pre-empted by [`Worker::stop`]; cancellation is observed by the
/// loop between calls. Returning `Err` (or panicking) terminates the worker.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tinyworkers::{Job, TaskError, Worker};
///
/// #[derive(Default)]
/// struct Counter { n: u32 }
///
/// struct Tick;
///
/// #[async_trait]
/// impl Job<Counter> for Tick {
///     async fn run(&self, worker: &Worker<Counter>, state: &mut Counter) -> Result<(), TaskError> {
///         state.n += 1;
///         if state.n == 3 {
///             worker.stop();
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job<S>: Send + Sync + 'static
where
    S: Send + 'static,
{
    /// Performs one invocation against the worker's state.
    async fn run(&self, worker: &Worker<S>, state: &mut S) -> Result<(), TaskError>;
}

/// Shared handle to a job.
pub type JobRef<S> = Arc<dyn Job<S>>;
