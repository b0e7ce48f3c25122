//! # Worker loop: repeated action/wait cycles until cancelled.
//!
//! Runs inside the tokio task spawned by [`Worker::start`](crate::Worker::start)
//! and owns the worker's state for its whole life.
//!
//! ## Flow
//! ```text
//! span(worker id, priority)
//! emit Started
//! loop {
//!   ├─► cancelled? ──► exit (Cancelled)
//!   ├─► cycles += 1; action(worker, &mut state)
//!   │       └─ Err / panic ──► exit (Faulted)
//!   ├─► cancelled? ──► exit (Cancelled)
//!   └─► wait(worker, &mut state)  or  sleep(idle) / yield
//!           └─ Err / panic ──► exit (Faulted)
//! }
//! fault? → cancel token (worker becomes terminal)
//! phase = Terminated
//! emit Stopped { state, cycles, exit }
//! state moved back into the worker; done token cancelled
//! ```
//!
//! ## Rules
//! - Action and wait strictly alternate; neither is ever pre-empted by stop.
//! - `Started` and `Stopped` fire exactly once per started worker.
//! - Nothing blocks between loop exit and `Stopped`.
//! - If the loop future is dropped unfinished (runtime shutdown), [`LoopGuard`]
//!   makes the worker terminal with [`ExitReason::Aborted`]; no `Stopped` fires.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tracing::Instrument;

use crate::{
    core::{phase::Phase, worker::Worker},
    error::TaskError,
    events::{ExitReason, WorkerEvent},
    jobs::Job,
};

/// Terminates the worker if the loop future is dropped before [`run`] returns.
///
/// Created before spawning and moved into the future, so it also fires when
/// the runtime drops the task without ever polling it.
pub(super) struct LoopGuard<S: 'static> {
    worker: Worker<S>,
    finished: bool,
}

impl<S: 'static> LoopGuard<S> {
    pub(super) fn new(worker: Worker<S>) -> Self {
        Self {
            worker,
            finished: false,
        }
    }

    fn disarm(mut self) {
        self.finished = true;
    }
}

impl<S: 'static> Drop for LoopGuard<S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let shared = self.worker.shared();
        shared.cancel.cancel();
        let _ = shared.exit.set(ExitReason::Aborted);
        shared.phase.store(Phase::Terminated);
        shared.abandon_state();
        shared.done.cancel();
        tracing::warn!(worker = %self.worker.id(), "worker loop dropped before completion");
    }
}

/// Runs the worker loop to completion.
pub(super) async fn run<S>(guard: LoopGuard<S>, state: S)
where
    S: Send + 'static,
{
    let span = tracing::debug_span!(
        "worker",
        id = %guard.worker.id(),
        priority = %guard.worker.priority(),
    );
    drive(&guard.worker, state).instrument(span).await;
    guard.disarm();
}

async fn drive<S>(worker: &Worker<S>, mut state: S)
where
    S: Send + 'static,
{
    let shared = worker.shared();
    tracing::debug!("worker started");
    shared.observers.emit(&WorkerEvent::started(worker, &state));

    let exit = cycle(worker, &mut state).await;
    let cycles = shared.cycles.load(Ordering::Acquire);
    match &exit {
        ExitReason::Faulted(err) => {
            tracing::error!(cycles, error = %err, label = err.as_label(), "worker faulted");
            shared.cancel.cancel();
        }
        _ => tracing::debug!(cycles, "worker stopped"),
    }

    let _ = shared.exit.set(exit.clone());
    shared.phase.store(Phase::Terminated);
    shared
        .observers
        .emit(&WorkerEvent::stopped(worker, &state, cycles, &exit));

    shared.restore_state(state);
    shared.done.cancel();
}

/// Alternates action and wait until cancellation or a fault.
async fn cycle<S>(worker: &Worker<S>, state: &mut S) -> ExitReason
where
    S: Send + 'static,
{
    let shared = worker.shared();
    loop {
        if shared.cancel.is_cancelled() {
            return ExitReason::Cancelled;
        }

        shared.cycles.fetch_add(1, Ordering::AcqRel);
        if let Err(err) = invoke(shared.action.as_ref(), worker, state).await {
            return ExitReason::Faulted(err);
        }

        if shared.cancel.is_cancelled() {
            return ExitReason::Cancelled;
        }

        match &shared.wait {
            Some(wait) => {
                if let Err(err) = invoke(wait.as_ref(), worker, state).await {
                    return ExitReason::Faulted(err);
                }
            }
            None => idle(shared.idle).await,
        }
    }
}

/// Runs one job call, converting a panic into [`TaskError::Panicked`].
async fn invoke<S>(job: &dyn Job<S>, worker: &Worker<S>, state: &mut S) -> Result<(), TaskError>
where
    S: Send + 'static,
{
    match AssertUnwindSafe(job.run(worker, state)).catch_unwind().await {
        Ok(res) => res,
        Err(panic_err) => Err(TaskError::from_panic(panic_err.as_ref())),
    }
}

/// Default wait phase.
async fn idle(delay: Option<Duration>) {
    match delay {
        Some(d) => time::sleep(d).await,
        None => tokio::task::yield_now().await,
    }
}
