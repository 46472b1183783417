//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [start-requested] state=Connecting
//! [permission-requested] capability=post-notifications
//! [spawned] state=Connected
//! [progress] percent=40
//! [stop-requested] state=Disconnecting
//! [joined] state=Disconnected
//! [aborted] reason="worker failed: peer reset"
//! [join-timeout] grace_ms=1000
//! ```
//!
//! Enabled via the `logging` feature. Not intended for production use –
//! implement a custom [`Subscribe`] for structured logging.

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::StartRequested => {
                println!("[start-requested] state={:?}", e.state);
            }
            EventKind::PermissionRequested => {
                println!("[permission-requested] capability={:?}", e.reason);
            }
            EventKind::PermissionDenied => {
                println!("[permission-denied] capability={:?}", e.reason);
            }
            EventKind::WorkerSpawned => {
                println!("[spawned] state={:?}", e.state);
            }
            EventKind::Progress => {
                println!("[progress] percent={:?}", e.percent);
            }
            EventKind::StopRequested => {
                println!("[stop-requested] state={:?}", e.state);
            }
            EventKind::WorkerJoined => {
                println!("[joined] state={:?}", e.state);
            }
            EventKind::WorkerAborted => {
                println!("[aborted] reason={:?}", e.reason);
            }
            EventKind::JoinTimedOut => {
                println!("[join-timeout] grace_ms={:?}", e.grace_ms);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
