//! # Function-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn(&Worker<S>, &mut S) -> BoxFuture<'_, _>`,
//! producing a fresh future per invocation that borrows the state for the
//! duration of the call.
//!
//! ## Example
//! ```rust
//! use tinyworkers::{JobFn, JobRef, TaskError};
//!
//! #[derive(Default)]
//! struct Hits { n: u64 }
//!
//! let job: JobRef<Hits> = JobFn::arc(|_worker, state: &mut Hits| {
//!     Box::pin(async move {
//!         state.n += 1;
//!         Ok::<_, TaskError>(())
//!     })
//! });
//! # let _ = job;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::{core::Worker, error::TaskError, jobs::job::Job};

/// Function-backed job implementation.
#[derive(Debug)]
pub struct JobFn<F> {
    f: F,
}

impl<F> JobFn<F> {
    /// Wraps a closure as a job.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`JobRef`](crate::JobRef).
    pub fn new<S>(f: F) -> Self
    where
        S: Send + 'static,
        F: for<'a> Fn(&'a Worker<S>, &'a mut S) -> BoxFuture<'a, Result<(), TaskError>>
            + Send
            + Sync
            + 'static,
    {
        Self { f }
    }

    /// Wraps a closure and returns it as a shared handle (`Arc<dyn Job<S>>`).
    pub fn arc<S>(f: F) -> Arc<dyn Job<S>>
    where
        S: Send + 'static,
        F: for<'a> Fn(&'a Worker<S>, &'a mut S) -> BoxFuture<'a, Result<(), TaskError>>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<S, F> Job<S> for JobFn<F>
where
    S: Send + 'static,
    F: for<'a> Fn(&'a Worker<S>, &'a mut S) -> BoxFuture<'a, Result<(), TaskError>>
        + Send
        + Sync
        + 'static,
{
    async fn run(&self, worker: &Worker<S>, state: &mut S) -> Result<(), TaskError> {
        (self.f)(worker, state).await
    }
}
