//! # Worker lifecycle phases.
//!
//! ```text
//! Created ──start──► Running ──stop──► Stopping ──loop exit──► Terminated
//!    │                  │                                          ▲
//!    │                  └──────────── callback fault ──────────────┤
//!    └───────────────────────── stop before start ─────────────────┘
//! ```
//!
//! `Terminated` is absorbing. Transitions are compare-and-swap on one atomic
//! byte, so concurrent `start`/`stop` calls resolve to exactly one winner.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase of a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Built, not started yet.
    Created = 0,
    /// Loop launched and cancellation not requested.
    Running = 1,
    /// Cancellation requested; loop finishing its current action/wait.
    Stopping = 2,
    /// Loop exited and `Stopped` was fired (or the worker was stopped before start).
    Terminated = 3,
}

impl Phase {
    /// Returns `true` while a loop is alive (`Running` or `Stopping`).
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running | Phase::Stopping)
    }

    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Phase::Created => "created",
            Phase::Running => "running",
            Phase::Stopping => "stopping",
            Phase::Terminated => "terminated",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Phase::Created,
            1 => Phase::Running,
            2 => Phase::Stopping,
            _ => Phase::Terminated,
        }
    }
}

/// Atomic holder of a [`Phase`].
#[derive(Debug)]
pub(crate) struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(Phase::Created as u8))
    }

    #[inline]
    pub(crate) fn load(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves `from → to`; returns `false` if the current phase is not `from`.
    #[inline]
    pub(crate) fn transition(&self, from: Phase, to: Phase) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub(crate) fn store(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::Release);
    }
}
