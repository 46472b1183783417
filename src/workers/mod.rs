//! Worker boundary: the [`Worker`] trait, the [`WorkerFn`] adapter, and the
//! [`Progress`] reporting handle.

mod progress;
mod worker;
mod worker_fn;

pub use progress::Progress;
pub use worker::Worker;
pub use worker_fn::{WorkerFn, WorkerRef};
