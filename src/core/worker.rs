//! # Worker: one recurring task and its state.
//!
//! A [`Worker`] owns one execution slot, its state, its job/wait callbacks,
//! a one-shot cancellation token and its lifecycle phase.
//!
//! ## Lifecycle
//! ```text
//! Worker::builder(id, action, state).build()     phase = Created
//!   ├─► with_state(|s| ...)   creator mutates the initial state
//!   ├─► on_started / on_stopped / subscribe
//!   ├─► start()                phase = Running, state moved into the loop
//!   │      loop: Started → action → wait → action → wait → ...
//!   ├─► stop()                 phase = Stopping (request only)
//!   │      loop observes cancel → phase = Terminated → Stopped
//!   │      state moved back into the worker
//!   └─► start()                no-op: a stopped worker never restarts
//! ```
//!
//! ## Rules
//! - At most one loop per worker; `start` is a no-op while running or after stop.
//! - `stop` never blocks and never pre-empts an in-flight action or wait.
//! - The state is owned by the loop while running; [`Worker::with_state`]
//!   returns [`RuntimeError::StateInUse`] in that window.
//! - The handle is cheap to clone; all clones refer to the same worker.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::Config,
        phase::{Phase, PhaseCell},
        runner,
    },
    error::RuntimeError,
    events::{EventKind, ExitReason, WorkerEvent},
    jobs::JobRef,
    observers::{ObserverFn, ObserverSet, Observe},
    policies::Priority,
};

/// Where the worker's state currently lives.
enum StateSlot<S> {
    /// Stored in the worker (before start, after termination).
    Idle(S),
    /// Moved into the running loop.
    Loaned,
    /// Removed by [`Worker::take_state`].
    Taken,
}

/// Data shared by every clone of a worker handle and its loop.
pub(super) struct Shared<S> {
    pub(super) id: Arc<str>,
    pub(super) action: JobRef<S>,
    pub(super) wait: Option<JobRef<S>>,
    pub(super) priority: Priority,
    pub(super) idle: Option<Duration>,
    pub(super) phase: PhaseCell,
    /// One-shot stop request; never reset.
    pub(super) cancel: CancellationToken,
    /// Cancelled once the worker is terminal and its state is back in the slot.
    pub(super) done: CancellationToken,
    pub(super) cycles: AtomicU64,
    pub(super) exit: OnceLock<ExitReason>,
    pub(super) observers: ObserverSet<S>,
    state: Mutex<StateSlot<S>>,
}

impl<S> Shared<S> {
    fn slot(&self) -> MutexGuard<'_, StateSlot<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the state back from the loop.
    pub(super) fn restore_state(&self, state: S) {
        *self.slot() = StateSlot::Idle(state);
    }

    /// Marks a loaned state as lost together with its loop.
    pub(super) fn abandon_state(&self) {
        let mut slot = self.slot();
        if matches!(*slot, StateSlot::Loaned) {
            *slot = StateSlot::Taken;
        }
    }
}

/// Handle to a recurring-task worker.
///
/// See the [module docs](self) for the lifecycle.
pub struct Worker<S> {
    inner: Arc<Shared<S>>,
}

impl<S: 'static> Clone for Worker<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: 'static> fmt::Debug for Worker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.inner.id)
            .field("priority", &self.inner.priority)
            .field("phase", &self.inner.phase.load())
            .field("cycles", &self.cycles())
            .field("observers", &self.inner.observers.len())
            .finish()
    }
}

impl<S: 'static> Worker<S> {
    /// Returns the worker id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Returns the advisory priority.
    #[inline]
    pub fn priority(&self) -> Priority {
        self.inner.priority
    }

    /// Returns the current lifecycle phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.inner.phase.load()
    }

    /// Returns `true` while the loop is alive (`Running` or `Stopping`).
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase().is_running()
    }

    /// Returns `true` once stop was requested (or a callback faulted).
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Number of action invocations started so far.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.inner.cycles.load(Ordering::Acquire)
    }

    /// Why the loop exited; `None` until the worker ran and terminated.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.inner.exit.get().cloned()
    }

    /// Completes when stop is requested.
    ///
    /// Useful inside custom wait jobs that should end early on stop.
    pub async fn cancelled(&self) {
        self.inner.cancel.cancelled().await
    }

    /// Returns a child of the worker's cancellation token.
    ///
    /// It is cancelled when the worker is stopped; cancelling it does not stop the worker.
    pub fn child_token(&self) -> CancellationToken {
        self.inner.cancel.child_token()
    }

    /// Requests the loop to stop.
    ///
    /// Idempotent and non-blocking. The in-flight action or wait completes
    /// normally; completion is observed through the `Stopped` event,
    /// [`wait_stopped`](Self::wait_stopped) or [`stop_and_wait`](Self::stop_and_wait).
    ///
    /// Stopping a worker that was never started makes it terminal without
    /// firing any event.
    pub fn stop(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        self.inner.cancel.cancel();

        if self.inner.phase.transition(Phase::Created, Phase::Terminated) {
            self.inner.done.cancel();
            tracing::debug!(worker = %self.inner.id, "worker stopped before start");
            return;
        }
        if self.inner.phase.transition(Phase::Running, Phase::Stopping) {
            tracing::debug!(worker = %self.inner.id, "worker stop requested");
        }
    }

    /// Waits until the worker is terminal and its state is readable again.
    ///
    /// Never completes for a worker that is neither started nor stopped.
    pub async fn wait_stopped(&self) {
        self.inner.done.cancelled().await
    }

    /// Requests stop, then waits up to `timeout` for the loop to finish.
    ///
    /// Returns [`RuntimeError::StopTimeout`] if the in-flight cycle did not
    /// finish in time; the loop keeps running to completion in that case.
    pub async fn stop_and_wait(&self, timeout: Duration) -> Result<(), RuntimeError> {
        self.stop();
        match time::timeout(timeout, self.inner.done.cancelled()).await {
            Ok(()) => Ok(()),
            Err(_elapsed) => Err(RuntimeError::StopTimeout {
                id: Arc::clone(&self.inner.id),
                timeout,
            }),
        }
    }

    /// Registers an observer; observers run in registration order.
    pub fn subscribe(&self, observer: Arc<dyn Observe<S>>) {
        self.inner.observers.push(observer);
    }

    /// Registers a closure called on every lifecycle event.
    pub fn on_event<F>(&self, f: F)
    where
        F: Fn(&WorkerEvent<'_, S>) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(ObserverFn::new(f)));
    }

    /// Registers a closure called on `Started`.
    pub fn on_started<F>(&self, f: F)
    where
        F: Fn(&WorkerEvent<'_, S>) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(ObserverFn::only(EventKind::Started, f)));
    }

    /// Registers a closure called on `Stopped`.
    pub fn on_stopped<F>(&self, f: F)
    where
        F: Fn(&WorkerEvent<'_, S>) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(ObserverFn::only(EventKind::Stopped, f)));
    }

    /// Runs `f` against the state while the loop does not own it.
    ///
    /// Before `start` this is how the creator prepares the initial state;
    /// after termination it exposes the final state.
    ///
    /// ### Errors
    /// - [`RuntimeError::StateInUse`] while the loop is running
    /// - [`RuntimeError::StateTaken`] after [`take_state`](Self::take_state)
    pub fn with_state<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, RuntimeError> {
        match &mut *self.inner.slot() {
            StateSlot::Idle(state) => Ok(f(state)),
            StateSlot::Loaned => Err(RuntimeError::StateInUse {
                id: Arc::clone(&self.inner.id),
            }),
            StateSlot::Taken => Err(RuntimeError::StateTaken {
                id: Arc::clone(&self.inner.id),
            }),
        }
    }

    /// Moves the final state out of a terminated worker.
    ///
    /// ### Errors
    /// - [`RuntimeError::StateInUse`] unless the worker is `Terminated`
    /// - [`RuntimeError::StateTaken`] if already taken
    pub fn take_state(&self) -> Result<S, RuntimeError> {
        let mut slot = self.inner.slot();
        if self.phase() != Phase::Terminated || matches!(*slot, StateSlot::Loaned) {
            return Err(RuntimeError::StateInUse {
                id: Arc::clone(&self.inner.id),
            });
        }
        match mem::replace(&mut *slot, StateSlot::Taken) {
            StateSlot::Idle(state) => Ok(state),
            _ => Err(RuntimeError::StateTaken {
                id: Arc::clone(&self.inner.id),
            }),
        }
    }

    pub(super) fn shared(&self) -> &Shared<S> {
        &self.inner
    }
}

impl<S> Worker<S>
where
    S: Send + 'static,
{
    /// Creates a worker with default configuration and no wait job.
    pub fn new(id: impl Into<Arc<str>>, action: JobRef<S>, state: S) -> Self {
        Self::builder(id, action, state).build()
    }

    /// Starts a builder for a worker with explicit wait job, priority or config.
    pub fn builder(id: impl Into<Arc<str>>, action: JobRef<S>, state: S) -> WorkerBuilder<S> {
        WorkerBuilder::new(id, action, state)
    }

    /// Launches the loop on the current tokio runtime.
    ///
    /// Returns immediately:
    /// - `Ok(true)` if the loop was launched;
    /// - `Ok(false)` if the worker is already running or was stopped (no restart);
    /// - `Err(RuntimeError::NoRuntime)` outside a tokio runtime (worker left untouched).
    pub fn start(&self) -> Result<bool, RuntimeError> {
        let handle = Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?;
        Ok(self.start_on(&handle))
    }

    /// Launches the loop on the given runtime; see [`start`](Self::start).
    pub fn start_on(&self, handle: &Handle) -> bool {
        if self.inner.cancel.is_cancelled() {
            return false;
        }
        if !self.inner.phase.transition(Phase::Created, Phase::Running) {
            return false;
        }

        let previous = mem::replace(&mut *self.inner.slot(), StateSlot::Loaned);
        let state = match previous {
            StateSlot::Idle(state) => state,
            other => {
                *self.inner.slot() = other;
                self.inner.cancel.cancel();
                self.inner.phase.store(Phase::Terminated);
                self.inner.done.cancel();
                tracing::error!(worker = %self.inner.id, "worker started without state");
                return false;
            }
        };

        handle.spawn(runner::run(runner::LoopGuard::new(self.clone()), state));
        true
    }
}

/// Builder for a single [`Worker`].
pub struct WorkerBuilder<S> {
    id: Arc<str>,
    action: JobRef<S>,
    state: S,
    wait: Option<JobRef<S>>,
    priority: Option<Priority>,
    config: Config,
}

impl<S> WorkerBuilder<S>
where
    S: Send + 'static,
{
    /// Creates a builder with the required parts.
    pub fn new(id: impl Into<Arc<str>>, action: JobRef<S>, state: S) -> Self {
        Self {
            id: id.into(),
            action,
            state,
            wait: None,
            priority: None,
            config: Config::default(),
        }
    }

    /// Sets the wait job run between actions (replaces the idle sleep).
    pub fn with_wait(mut self, wait: JobRef<S>) -> Self {
        self.wait = Some(wait);
        self
    }

    /// Optional variant of [`with_wait`](Self::with_wait).
    pub fn with_wait_opt(mut self, wait: Option<JobRef<S>>) -> Self {
        self.wait = wait;
        self
    }

    /// Sets the advisory priority (overrides `Config::priority`).
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the worker in phase `Created`.
    pub fn build(self) -> Worker<S> {
        Worker {
            inner: Arc::new(Shared {
                id: self.id,
                action: self.action,
                wait: self.wait,
                priority: self.priority.unwrap_or(self.config.priority),
                idle: self.config.idle_delay(),
                phase: PhaseCell::new(),
                cancel: CancellationToken::new(),
                done: CancellationToken::new(),
                cycles: AtomicU64::new(0),
                exit: OnceLock::new(),
                observers: ObserverSet::new(),
                state: Mutex::new(StateSlot::Idle(self.state)),
            }),
        }
    }
}
