//! # Worker abstraction.
//!
//! This module defines the [`Worker`] trait: the opaque, cancelable unit
//! that performs the actual streaming once the supervisor has spawned it.
//! The common handle type is [`WorkerRef`](crate::workers::WorkerRef), an
//! `Arc<dyn Worker>` suitable for sharing across the runtime.
//!
//! A worker receives a [`CancellationToken`] and must poll it at bounded
//! intervals: the polling interval is the system's responsiveness contract
//! for `stop()` (target: sub-second observable teardown).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::Progress;

/// # Asynchronous, cancelable streaming unit.
///
/// A `Worker` has a stable [`name`](Worker::name) and an async
/// [`run`](Worker::run) that streams until cancelled or finished. Progress
/// is reported through the non-blocking [`Progress`] handle; the wire
/// protocol behind `run` is entirely the implementor's business.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use linkvisor::{Progress, Worker, WorkerError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Worker for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(
///         &self,
///         start: u64,
///         progress: Progress,
///         ctx: CancellationToken,
///     ) -> Result<(), WorkerError> {
///         let mut value = start;
///         while !ctx.is_cancelled() {
///             // stream `value` to the peer...
///             progress.report((value % 100) as u8);
///             value += 1;
///             tokio::time::sleep(std::time::Duration::from_millis(50)).await;
///         }
///         Err(WorkerError::Canceled)
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Streams until completion or cancellation.
    ///
    /// Implementations must check `ctx` at bounded intervals and return
    /// promptly once it is cancelled — return [`WorkerError::Canceled`] to
    /// mark the exit as a cooperative teardown. Any other return while the
    /// link is up is reported as a dropped connection.
    async fn run(
        &self,
        start: u64,
        progress: Progress,
        ctx: CancellationToken,
    ) -> Result<(), WorkerError>;
}
