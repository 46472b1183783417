//! # Handle to the one running worker context.
//!
//! At most one [`WorkerHandle`] exists per supervisor; this is the core
//! invariant the whole design protects. The handle owns the worker's
//! cancellation token, the join handle of its driver task, and the spawn
//! epoch used to reject signals from abandoned contexts.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owned context of a spawned worker.
pub(crate) struct WorkerHandle {
    /// Cancellation token handed to the worker; cancelling it requests
    /// cooperative teardown.
    pub cancel: CancellationToken,

    /// Driver task executing the worker. `stop()` takes it to perform the
    /// bounded join; dropping the handle with it still present detaches the
    /// task.
    pub join: Option<JoinHandle<()>>,

    /// Monotonic spawn counter. Exit and progress signals carry the epoch
    /// they originated from; signals from an older epoch are stale and
    /// ignored.
    pub epoch: u64,
}

impl WorkerHandle {
    /// Requests cooperative cancellation of the worker.
    pub fn request_stop(&self) {
        self.cancel.cancel();
    }
}
