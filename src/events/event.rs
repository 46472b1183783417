//! # Runtime events emitted by the link supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Intent events**: host commands entering the state machine
//!   (start/stop requested, permission round-trip)
//! - **Worker events**: spawn, progress, join, abort
//! - **Diagnostic events**: bounded-join expiry
//!
//! The [`Event`] struct carries metadata such as the resulting state, the
//! progress percentage, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Transitions are totally ordered per supervisor, so `seq`
//! order matches transition order for events of one instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::LinkState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of supervisor events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Intent events ===
    /// `start()` was accepted; the link entered `Connecting`.
    ///
    /// Sets:
    /// - `state`: `Connecting`
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StartRequested,

    /// Worker spawn is deferred on an in-flight permission request.
    ///
    /// Sets:
    /// - `reason`: capability name
    /// - `at`, `seq`
    PermissionRequested,

    /// The pending permission request was denied; the start aborted.
    ///
    /// Sets:
    /// - `state`: `Disconnected`
    /// - `reason`: capability name
    /// - `at`, `seq`
    PermissionDenied,

    /// `stop()` was accepted.
    ///
    /// Sets:
    /// - `state`: `Disconnecting` (worker teardown pending) or
    ///   `Disconnected` (no worker existed, pending start aborted)
    /// - `at`, `seq`
    StopRequested,

    // === Worker events ===
    /// Worker context created and started.
    ///
    /// Sets:
    /// - `state`: `Connected`
    /// - `at`, `seq`
    WorkerSpawned,

    /// Worker reported streaming progress.
    ///
    /// Sets:
    /// - `percent`: 0–100
    /// - `at`, `seq`
    Progress,

    /// Worker observed cancellation and its context was joined.
    ///
    /// Sets:
    /// - `state`: `Disconnected`
    /// - `at`, `seq`
    WorkerJoined,

    /// Worker terminated on its own while the link was up.
    ///
    /// Sets:
    /// - `state`: `Disconnected`
    /// - `reason`: exit classification/message
    /// - `at`, `seq`
    WorkerAborted,

    // === Diagnostic events ===
    /// Worker did not join within the grace bound; context abandoned.
    ///
    /// Non-fatal: the state still advances to `Disconnected`, accepting a
    /// possible resource leak over blocking the caller.
    ///
    /// Sets:
    /// - `state`: `Disconnected`
    /// - `grace_ms`: the elapsed bound (ms)
    /// - `at`, `seq`
    JoinTimedOut,
}

/// Supervisor event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Link state after the transition, if the event marks one.
    pub state: Option<LinkState>,
    /// Progress percentage (0–100).
    pub percent: Option<u8>,
    /// Human-readable reason (capability names, abort causes).
    pub reason: Option<Arc<str>>,
    /// Join grace bound in milliseconds (compact).
    pub grace_ms: Option<u32>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            state: None,
            percent: None,
            reason: None,
            grace_ms: None,
            kind,
        }
    }

    /// Attaches the post-transition link state.
    #[inline]
    pub fn with_state(mut self, state: LinkState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches a progress percentage.
    #[inline]
    pub fn with_percent(mut self, percent: u8) -> Self {
        self.percent = Some(percent);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the join grace bound (stored as milliseconds).
    #[inline]
    pub fn with_grace(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.grace_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::now(EventKind::StartRequested);
        let b = Event::now(EventKind::WorkerSpawned);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::now(EventKind::WorkerAborted)
            .with_state(LinkState::Disconnected)
            .with_reason("peer reset");
        assert_eq!(ev.kind, EventKind::WorkerAborted);
        assert_eq!(ev.state, Some(LinkState::Disconnected));
        assert_eq!(ev.reason.as_deref(), Some("peer reset"));
    }
}
