//! # Non-blocking progress reporting handle.
//!
//! [`Progress`] is the half of a bounded channel handed to the worker. The
//! supervisor pumps the other half back through its mutual-exclusion
//! boundary before anything touches the status surface, so the worker never
//! talks to observers directly.
//!
//! ## Rules
//! - `report()` never blocks and never fails visibly: on a full queue the
//!   report is dropped (the next one carries fresher information anyway).
//! - The channel closes when the worker drops its handle; the pump ends
//!   with it.

use tokio::sync::mpsc;

/// Cloneable, non-blocking progress reporter.
#[derive(Clone, Debug)]
pub struct Progress {
    tx: mpsc::Sender<u8>,
}

impl Progress {
    /// Creates a progress channel with the given queue capacity (clamped
    /// to ≥ 1). The receiver side is consumed by the supervisor's pump.
    pub(crate) fn channel(capacity: usize) -> (Self, mpsc::Receiver<u8>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Reports a progress percentage (0–100; larger values are clamped by
    /// the supervisor). Drops the report if the queue is full.
    pub fn report(&self, percent: u8) {
        let _ = self.tx.try_send(percent);
    }
}
