//! # Lifecycle events emitted by a worker loop.
//!
//! The [`EventKind`] enum classifies the two lifecycle boundaries of a worker:
//! - **Started**: fired once, from the loop, before the first action;
//! - **Stopped**: fired once, from the loop, after the last action/wait pair.
//!
//! The [`WorkerEvent`] payload borrows the worker handle and its state at that
//! instant. It is only valid for the duration of the observer call; copy out
//! whatever must outlive it.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the order of events collected from several workers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::{core::Worker, error::TaskError};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The loop is running and about to invoke the first action.
    ///
    /// Sets:
    /// - `state`: state as left by the creator
    /// - `cycles`: always `0`
    Started,

    /// The loop exited and the worker is terminal.
    ///
    /// Sets:
    /// - `state`: state as last mutated by the callbacks
    /// - `cycles`: number of actions invoked
    /// - `exit`: why the loop exited
    Stopped,
}

impl EventKind {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Started => "started",
            EventKind::Stopped => "stopped",
        }
    }
}

/// Why a worker loop exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Cancellation was requested with [`Worker::stop`](crate::Worker::stop).
    Cancelled,
    /// A job or wait callback returned an error or panicked.
    Faulted(TaskError),
    /// The loop was dropped before completing (runtime shut down).
    ///
    /// No `Stopped` event is fired and the state is lost.
    Aborted,
}

impl ExitReason {
    /// Returns the fault, if the loop exited because of one.
    pub fn fault(&self) -> Option<&TaskError> {
        match self {
            ExitReason::Cancelled | ExitReason::Aborted => None,
            ExitReason::Faulted(err) => Some(err),
        }
    }

    /// Returns `true` if the loop exited because of a callback fault.
    #[inline]
    pub fn is_fault(&self) -> bool {
        matches!(self, ExitReason::Faulted(_))
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Cancelled => f.write_str("cancelled"),
            ExitReason::Faulted(err) => write!(f, "faulted: {err}"),
            ExitReason::Aborted => f.write_str("aborted"),
        }
    }
}

/// Lifecycle event delivered to observers.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `state`: snapshot reference to the worker's state at that instant
pub struct WorkerEvent<'a, S> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Worker that emitted the event.
    pub worker: &'a Worker<S>,
    /// Worker state at the time of the event.
    pub state: &'a S,
    /// Number of action invocations so far.
    pub cycles: u64,
    /// Exit reason; set only for [`EventKind::Stopped`].
    pub exit: Option<&'a ExitReason>,
}

impl<'a, S: 'static> WorkerEvent<'a, S> {
    fn new(kind: EventKind, worker: &'a Worker<S>, state: &'a S, cycles: u64) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker,
            state,
            cycles,
            exit: None,
        }
    }

    pub(crate) fn started(worker: &'a Worker<S>, state: &'a S) -> Self {
        Self::new(EventKind::Started, worker, state, 0)
    }

    pub(crate) fn stopped(
        worker: &'a Worker<S>,
        state: &'a S,
        cycles: u64,
        exit: &'a ExitReason,
    ) -> Self {
        let mut ev = Self::new(EventKind::Stopped, worker, state, cycles);
        ev.exit = Some(exit);
        ev
    }

    /// Id of the emitting worker.
    #[inline]
    pub fn id(&self) -> &str {
        self.worker.id()
    }

    /// Returns the fault carried by a `Stopped` event, if any.
    #[inline]
    pub fn fault(&self) -> Option<&TaskError> {
        self.exit.and_then(ExitReason::fault)
    }
}
