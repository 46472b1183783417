//! # Status bridge: events → [`StatusSink`].
//!
//! [`StatusWriter`] is the built-in subscriber that keeps the host's status
//! surface in sync with the link. It renders:
//!
//! ```text
//! StartRequested        → set_text("Connecting…")
//! WorkerSpawned         → set_text("Connected")
//! Progress              → set_progress(p), set_text("Progress: p%")
//! StopRequested/…       → set_text("Disconnected")
//! ```
//!
//! The supervisor never publishes a stale progress event, so the
//! per-subscriber FIFO queue guarantees the sink ends on the text of the
//! last real transition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::notify::StatusSink;

use super::Subscribe;

/// Built-in subscriber driving a [`StatusSink`].
pub struct StatusWriter {
    sink: Arc<dyn StatusSink>,
}

impl StatusWriter {
    /// Wraps the given sink.
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Subscribe for StatusWriter {
    async fn on_event(&self, event: &Event) {
        match event.kind {
            EventKind::Progress => {
                if let Some(p) = event.percent {
                    self.sink.set_progress(p);
                    self.sink.set_text(&format!("Progress: {p}%"));
                }
            }
            EventKind::StartRequested
            | EventKind::WorkerSpawned
            | EventKind::StopRequested
            | EventKind::PermissionDenied
            | EventKind::WorkerJoined
            | EventKind::WorkerAborted
            | EventKind::JoinTimedOut => {
                if let Some(state) = event.state {
                    self.sink.set_text(state.label());
                }
            }
            EventKind::PermissionRequested => {}
        }
    }

    fn name(&self) -> &'static str {
        "status"
    }
}
