//! Error types used by workers and their callbacks.
//!
//! This module defines two error enums:
//!
//! - [`TaskError`] — faults raised by a worker's job or wait callback.
//! - [`RuntimeError`] — misuse of a worker handle by the caller (no runtime, stop timeout, state access).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! Double stop and start-after-stop are **not** errors: both are silent no-ops.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// # Faults raised by a job or wait callback.
///
/// Any fault terminates the worker that raised it. The fault is delivered
/// through the `Stopped` event as [`ExitReason::Faulted`](crate::ExitReason::Faulted);
/// sibling workers are never affected.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The callback returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The callback panicked; the panic was caught by the worker loop.
    #[error("callback panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use tinyworkers::TaskError;
    ///
    /// let err = TaskError::fail("disk full");
    /// assert_eq!(err.to_string(), "execution failed: disk full");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tinyworkers::TaskError;
    ///
    /// let err = TaskError::Panicked { info: "boom".into() };
    /// assert_eq!(err.as_label(), "task_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Converts a caught panic payload into [`TaskError::Panicked`].
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        TaskError::Panicked { info }
    }
}

/// # Errors produced by worker handle operations.
///
/// These are reported synchronously to the caller of the violating operation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// `start` was called outside of a tokio runtime.
    #[error("no tokio runtime available to spawn the worker loop")]
    NoRuntime,

    /// The worker loop did not finish within the requested time after stop.
    #[error("worker {id:?} did not stop within {timeout:?}")]
    StopTimeout {
        /// Id of the worker that is still running.
        id: Arc<str>,
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The state is owned by the running loop and cannot be accessed.
    #[error("state of worker {id:?} is owned by its running loop")]
    StateInUse {
        /// Id of the running worker.
        id: Arc<str>,
    },

    /// The state was already taken out of the terminated worker.
    #[error("state of worker {id:?} was already taken")]
    StateTaken {
        /// Id of the worker.
        id: Arc<str>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tinyworkers::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::NoRuntime.as_label(), "runtime_missing");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoRuntime => "runtime_missing",
            RuntimeError::StopTimeout { .. } => "runtime_stop_timeout",
            RuntimeError::StateInUse { .. } => "runtime_state_in_use",
            RuntimeError::StateTaken { .. } => "runtime_state_taken",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NoRuntime => "no tokio runtime".to_string(),
            RuntimeError::StopTimeout { id, timeout } => {
                format!("stop timeout after {timeout:?}; worker={id}")
            }
            RuntimeError::StateInUse { id } => format!("state in use; worker={id}"),
            RuntimeError::StateTaken { id } => format!("state taken; worker={id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_str() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(
            TaskError::from_panic(payload.as_ref()),
            TaskError::Panicked {
                info: "boom".into()
            }
        );
    }

    #[test]
    fn test_panic_payload_string() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("formatted 42"));
        assert_eq!(
            TaskError::from_panic(payload.as_ref()),
            TaskError::Panicked {
                info: "formatted 42".into()
            }
        );
    }

    #[test]
    fn test_panic_payload_unknown() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(
            TaskError::from_panic(payload.as_ref()).as_message(),
            "panic: unknown panic"
        );
    }

    #[test]
    fn test_stop_timeout_message() {
        let err = RuntimeError::StopTimeout {
            id: Arc::from("3"),
            timeout: Duration::from_millis(50),
        };
        assert_eq!(err.as_label(), "runtime_stop_timeout");
        assert_eq!(err.to_string(), "worker \"3\" did not stop within 50ms");
    }
}
