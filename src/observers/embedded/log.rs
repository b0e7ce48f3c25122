//! # LogWriter — simple event printer
//!
//! A minimal observer that prints lifecycle events to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] worker="3" priority=below_normal
//! [stopped] worker="3" cycles=5 exit=cancelled
//! [stopped] worker="4" cycles=2 exit=faulted: execution failed: disk full
//! ```

use crate::events::{EventKind, WorkerEvent};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render<S: 'static>(e: &WorkerEvent<'_, S>) -> String {
        match (e.kind, e.exit) {
            (EventKind::Started, _) => {
                format!(
                    "[started] worker={:?} priority={}",
                    e.id(),
                    e.worker.priority()
                )
            }
            (EventKind::Stopped, Some(exit)) => format!(
                "[stopped] worker={:?} cycles={} exit={exit}",
                e.id(),
                e.cycles
            ),
            (EventKind::Stopped, None) => {
                format!("[stopped] worker={:?} cycles={}", e.id(), e.cycles)
            }
        }
    }
}

impl<S: 'static> Observe<S> for LogWriter {
    fn on_event(&self, e: &WorkerEvent<'_, S>) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
