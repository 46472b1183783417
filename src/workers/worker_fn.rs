//! # Function-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn(u64, Progress, CancellationToken) -> Fut`,
//! producing a fresh future per spawn. This avoids shared mutable state: if
//! a worker needs state across restarts, share it explicitly via `Arc<...>`
//! inside the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use linkvisor::{Progress, Worker, WorkerError, WorkerFn, WorkerRef};
//!
//! let w: WorkerRef = WorkerFn::arc("uplink", |start: u64, _progress: Progress, ctx: CancellationToken| async move {
//!     let _ = start;
//!     if ctx.is_cancelled() {
//!         return Err(WorkerError::Canceled);
//!     }
//!     // stream...
//!     Ok(())
//! });
//!
//! assert_eq!(w.name(), "uplink");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::{Progress, Worker};

/// Shared handle to a worker (`Arc<dyn Worker>`).
pub type WorkerRef = Arc<dyn Worker>;

/// Function-backed worker implementation.
///
/// Wraps a closure that *creates* a new future per spawn.
#[derive(Debug)]
pub struct WorkerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new function-backed worker.
    ///
    /// Prefer [`WorkerFn::arc`] when you immediately need a [`WorkerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the worker and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Worker for WorkerFn<F>
where
    F: Fn(u64, Progress, CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        start: u64,
        progress: Progress,
        ctx: CancellationToken,
    ) -> Result<(), WorkerError> {
        (self.f)(start, progress, ctx).await
    }
}
