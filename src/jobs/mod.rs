//! # Job abstractions.
//!
//! This module provides the callback types a worker runs:
//! - [`Job`] - trait for the per-cycle action and the optional wait callback
//! - [`JobFn`] - closure-backed job implementation
//! - [`JobRef`] - shared reference to a job (`Arc<dyn Job<S>>`)

mod job;
mod job_fn;

pub use job::{Job, JobRef};
pub use job_fn::JobFn;
