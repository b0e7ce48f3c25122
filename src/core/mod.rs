//! Runtime core: worker lifecycle and batches.
//!
//! The public API from this module is [`Worker`] (one recurring task),
//! [`Factory`] (batches of workers) and [`Config`].
//!
//! Internal modules:
//! - [`config`]: shared settings (idle delay, default priority);
//! - [`phase`]: the `Created → Running → Stopping → Terminated` state machine;
//! - [`worker`]: the worker handle (start / stop / observers / state access);
//! - [`runner`]: the loop alternating action and wait phases;
//! - [`factory`]: batch construction and helpers.

mod config;
mod factory;
mod phase;
mod runner;
mod worker;

pub use config::{Config, DEFAULT_IDLE};
pub use factory::{Factory, IdGenerator, create_batch, default_id, start_all, stop_all};
pub use phase::Phase;
pub use worker::{Worker, WorkerBuilder};
