//! Error types used by the linkvisor supervisor and workers.
//!
//! This module defines two main error enums:
//!
//! - [`WorkerError`] — errors raised by the streaming worker itself.
//! - [`StoreError`] — errors raised by the durable state store.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Supervisor failures are not modeled as errors: every failure path
//! converges on the `Disconnected` state plus a published event, so the
//! public operations return the resulting state instead of a `Result`.

use thiserror::Error;

/// # Errors produced by worker execution.
///
/// A worker that exits with [`WorkerError::Canceled`] is treated as a
/// graceful teardown; any other exit while the link is up is surfaced as a
/// dropped connection.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker failed while streaming (e.g. the peer went away).
    #[error("worker failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable worker error (bad configuration, refused handshake).
    #[error("worker fatal: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Worker observed its cancellation token and exited cooperatively.
    #[error("worker canceled")]
    Canceled,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use linkvisor::WorkerError;
    ///
    /// let err = WorkerError::Fail { error: "peer reset".into() };
    /// assert_eq!(err.as_label(), "worker_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Fatal { .. } => "worker_fatal",
            WorkerError::Canceled => "worker_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkerError::Fail { error } => format!("error: {error}"),
            WorkerError::Fatal { error } => format!("fatal: {error}"),
            WorkerError::Canceled => "canceled".to_string(),
        }
    }

    /// True when the exit is a cooperative response to cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, WorkerError::Canceled)
    }
}

/// # Errors produced by the durable state store.
///
/// Store failures are non-fatal to the supervisor: the in-memory transition
/// proceeds and the failure is logged as a warning.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),

    /// Record did not parse as the expected key-value document.
    #[error("store format: {0}")]
    Format(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "store_io",
            StoreError::Format(_) => "store_format",
        }
    }
}
