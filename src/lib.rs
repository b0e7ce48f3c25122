//! # tinyworkers
//!
//! **tinyworkers** is a minimal recurring-task runner for tokio.
//!
//! A [`Worker`] repeatedly runs a job against its own mutable state, on its own
//! tokio task, alternating with a wait phase, until it is told to stop. A
//! [`Factory`] creates batches of workers that share the same behavior.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     Factory::new(action).with_wait(..).with_priority(..).create(N)
//!            │
//!            ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Worker "0"  │   │  Worker "1"  │   │ Worker "N-1" │
//!     │ state: S     │   │ state: S     │   │ state: S     │
//!     │ observers    │   │ observers    │   │ observers    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ start()          │ start()          │ start()
//!            ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  tokio task  │   │  tokio task  │   │  tokio task  │
//!     │ (loop below) │   │ (loop below) │   │ (loop below) │
//!     └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//! Workers are fully independent: no pool, no queue, no shared state.
//!
//! ### Lifecycle
//! ```text
//! Created ──start()──► Running ──stop()──► Stopping ──► Terminated
//!
//! loop {
//!   ├─► Started (once)               observers, in registration order
//!   ├─► cancelled? → exit
//!   ├─► action(worker, &mut state)   Err / panic → exit (Faulted)
//!   ├─► cancelled? → exit
//!   └─► wait(worker, &mut state)     or sleep(Config::idle), default 100ms
//! }
//! running = false
//! Stopped (once)                     carries final state + ExitReason
//! ```
//!
//! - `stop()` is a request: the in-flight action or wait always completes.
//! - A stopped worker is terminal; `start()` on it is a no-op.
//! - A failing or panicking job terminates only its own worker.
//! - A loop dropped by runtime shutdown leaves its worker terminal
//!   ([`ExitReason::Aborted`]) without firing `Stopped`.
//!
//! ## Features
//! | Area             | Description                                               | Key types / traits                       |
//! |------------------|-----------------------------------------------------------|------------------------------------------|
//! | **Workers**      | Start/stop one recurring task and access its state.       | [`Worker`], [`WorkerBuilder`], [`Phase`] |
//! | **Batches**      | Create N workers with shared behavior and generated ids.  | [`Factory`], [`create_batch`]            |
//! | **Jobs**         | Action and wait callbacks as traits or closures.          | [`Job`], [`JobFn`], [`JobRef`]           |
//! | **Observers**    | Hook into `Started` / `Stopped`.                          | [`Observe`], [`WorkerEvent`]             |
//! | **Errors**       | Typed callback faults and handle misuse errors.           | [`TaskError`], [`RuntimeError`]          |
//! | **Configuration**| Idle delay and default priority.                          | [`Config`], [`Priority`]                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! Internal diagnostics are emitted through [`tracing`] (span `worker` with `id`
//! and `priority`); install any subscriber to see them.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tinyworkers::{Config, Factory, JobFn, TaskError, Worker};
//!
//! #[derive(Default)]
//! struct Counter { n: u32 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let action = JobFn::arc(|worker: &Worker<Counter>, state: &mut Counter| {
//!         Box::pin(async move {
//!             state.n += 1;
//!             if state.n == 5 {
//!                 worker.stop();
//!             }
//!             Ok::<_, TaskError>(())
//!         })
//!     });
//!
//!     let cfg = Config { idle: Duration::from_millis(5), ..Config::default() };
//!     let workers = Factory::new(action).with_config(cfg).create(3);
//!
//!     for w in &workers {
//!         w.on_stopped(|ev| println!("worker {} stopped after {} cycles", ev.id(), ev.cycles));
//!         w.start()?;
//!     }
//!     for w in &workers {
//!         w.wait_stopped().await;
//!         assert_eq!(w.with_state(|s| s.n)?, 5);
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod jobs;
mod observers;
mod policies;

// ---- Public re-exports ----

pub use crate::core::{
    Config, DEFAULT_IDLE, Factory, IdGenerator, Phase, Worker, WorkerBuilder, create_batch,
    default_id, start_all, stop_all,
};
pub use error::{RuntimeError, TaskError};
pub use events::{EventKind, ExitReason, WorkerEvent};
pub use jobs::{Job, JobFn, JobRef};
pub use observers::{ObserverFn, ObserverSet, Observe};
pub use policies::Priority;

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
