//! # Link lifecycle states.
//!
//! [`LinkState`] is the four-state machine the supervisor owns:
//!
//! ```text
//! Disconnected ──start()──► Connecting ──grant/spawn──► Connected
//!      ▲                        │                           │
//!      │◄──deny / stop()────────┘                           │ stop()
//!      │                                                    ▼
//!      └◄──worker joined / grace elapsed──────────── Disconnecting
//! ```
//!
//! Exactly one value is current at any instant; all reads and writes go
//! through the supervisor.

/// Current state of the supervised link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkState {
    /// No worker exists; the link is fully down. Initial and terminal state.
    Disconnected = 0,

    /// `start()` was accepted. The worker may not exist yet: spawn is
    /// deferred while a permission request is in flight.
    Connecting = 1,

    /// Worker spawned and streaming.
    Connected = 2,

    /// Cooperative cancellation requested; the worker is tearing down under
    /// a bounded join grace.
    Disconnecting = 3,
}

impl LinkState {
    /// Decodes the compact representation used by the supervisor's
    /// lock-free state mirror.
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => LinkState::Connecting,
            2 => LinkState::Connected,
            3 => LinkState::Disconnecting,
            _ => LinkState::Disconnected,
        }
    }

    /// True while the link counts as intended-active.
    ///
    /// This is exactly the range mirrored into the persisted flag:
    /// `Connecting` and `Connected` persist `true`, everything else `false`.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, LinkState::Connecting | LinkState::Connected)
    }

    /// Status-surface label for this state.
    ///
    /// `Disconnecting` already reads as `Disconnected`: stop is user intent,
    /// and the surface reflects it immediately regardless of teardown
    /// latency.
    pub fn label(self) -> &'static str {
        match self {
            LinkState::Connecting => "Connecting…",
            LinkState::Connected => "Connected",
            LinkState::Disconnected | LinkState::Disconnecting => "Disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_range_matches_persisted_mapping() {
        assert!(LinkState::Connecting.is_active());
        assert!(LinkState::Connected.is_active());
        assert!(!LinkState::Disconnecting.is_active());
        assert!(!LinkState::Disconnected.is_active());
    }

    #[test]
    fn disconnecting_reads_as_disconnected() {
        assert_eq!(LinkState::Disconnecting.label(), "Disconnected");
        assert_eq!(LinkState::Disconnected.label(), "Disconnected");
        assert_eq!(LinkState::Connecting.label(), "Connecting…");
        assert_eq!(LinkState::Connected.label(), "Connected");
    }
}
