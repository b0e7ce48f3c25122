//! # Worker configuration.
//!
//! Provides [`Config`], the settings shared by workers built from one
//! [`Factory`](crate::Factory) or [`WorkerBuilder`](crate::WorkerBuilder).
//!
//! Defaults are immutable values ([`DEFAULT_IDLE`], [`Priority::default`]);
//! overriding them means passing a different `Config`, never mutating
//! process-wide state.
//!
//! ## Sentinel values
//! - `idle = 0s` → no sleep between cycles; the loop only yields to the runtime

use std::time::Duration;

use crate::policies::Priority;

/// Idle delay used between cycles when a worker has no wait job.
pub const DEFAULT_IDLE: Duration = Duration::from_millis(100);

/// Configuration for worker loops.
///
/// ## Field semantics
/// - `idle`: Default wait phase when no wait job is set (`0s` = yield only)
/// - `priority`: Advisory priority when none is given explicitly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Sleep between two actions when the worker has no wait job.
    ///
    /// The sleep is not interrupted by stop: an in-flight wait phase
    /// always completes.
    pub idle: Duration,

    /// Default advisory priority.
    ///
    /// Used when the builder or factory is not given one explicitly.
    pub priority: Priority,
}

impl Config {
    /// Returns the default wait phase as an `Option`.
    ///
    /// - `None` → yield to the runtime only
    /// - `Some(d)` → sleep `d` between cycles
    #[inline]
    pub fn idle_delay(&self) -> Option<Duration> {
        if self.idle == Duration::ZERO {
            None
        } else {
            Some(self.idle)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `idle = 100ms`
    /// - `priority = Priority::BelowNormal`
    fn default() -> Self {
        Self {
            idle: DEFAULT_IDLE,
            priority: Priority::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.idle, Duration::from_millis(100));
        assert_eq!(cfg.priority, Priority::BelowNormal);
        assert_eq!(cfg.idle_delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_idle_is_yield_only() {
        let cfg = Config {
            idle: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.idle_delay(), None);
    }
}
