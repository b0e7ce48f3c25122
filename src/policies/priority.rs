//! # Execution priority hint.
//!
//! [`Priority`] is an **advisory** hint attached to a worker. It is recorded on
//! the worker and on the loop's tracing span, so logs and observers can tell
//! background workers from latency-sensitive ones.
//!
//! Worker loops run as tokio tasks, which have no native priority. The hint
//! therefore never changes scheduling and never affects correctness.
//!
//! ```text
//! Lowest < BelowNormal (default) < Normal < AboveNormal < Highest
//! ```

use std::fmt;

/// Advisory execution priority of a worker loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Lowest priority.
    Lowest,
    /// Below normal priority (default for workers).
    #[default]
    BelowNormal,
    /// Normal priority.
    Normal,
    /// Above normal priority.
    AboveNormal,
    /// Highest priority.
    Highest,
}

impl Priority {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::Lowest => "lowest",
            Priority::BelowNormal => "below_normal",
            Priority::Normal => "normal",
            Priority::AboveNormal => "above_normal",
            Priority::Highest => "highest",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
