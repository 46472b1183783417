//! # Status surface seam.
//!
//! [`StatusSink`] is the external collaborator that renders a persistent
//! status indicator (a notification, a tray icon, a TUI widget). The
//! supervisor never calls it directly: the built-in
//! [`StatusWriter`](crate::subscribers::StatusWriter) subscriber translates
//! published events into sink calls from its own worker loop, so a slow
//! sink can never block a state transition.
//!
//! ## Contract
//! - Calls must not block; repeated identical updates are harmless
//!   (idempotent rendering).
//! - Text values are the state labels: `Connecting…`, `Connected`,
//!   `Disconnected`, plus `Progress: N%` while streaming.

/// External status indicator.
pub trait StatusSink: Send + Sync + 'static {
    /// Replaces the indicator text.
    fn set_text(&self, text: &str);

    /// Updates the 0–100 progress display.
    fn set_progress(&self, percent: u8);
}

/// Sink that discards all updates.
///
/// Useful for headless hosts and tests that only care about events.
pub struct NullSink;

impl StatusSink for NullSink {
    fn set_text(&self, _text: &str) {}
    fn set_progress(&self, _percent: u8) {}
}
