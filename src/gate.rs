//! # Permission precondition seam.
//!
//! [`PermissionGate`] models the host's asynchronous permission prompt. The
//! supervisor asks [`is_granted`](PermissionGate::is_granted) before a
//! privileged spawn; when the answer is no, it calls
//! [`request`](PermissionGate::request) and defers worker creation until the
//! host delivers the verdict through
//! [`Supervisor::on_permission_result`](crate::Supervisor::on_permission_result).
//!
//! Correlation is single-slot: at most one request is in flight per
//! supervisor, and a second `start()` while one is pending is an idempotent
//! no-op. Overlapping prompts are deliberately unsupported.

/// External permission prompt.
pub trait PermissionGate: Send + Sync + 'static {
    /// True when the capability is already granted and a worker may spawn
    /// without prompting.
    fn is_granted(&self, capability: &str) -> bool;

    /// Asks the host to prompt for the capability.
    ///
    /// Fire-and-forget: the verdict arrives later via
    /// `Supervisor::on_permission_result`. Must not block.
    fn request(&self, capability: &str);
}

/// Gate that grants everything up front.
///
/// For hosts without a permission concept (and for tests that exercise the
/// direct `start()` → `Connected` path).
pub struct OpenGate;

impl PermissionGate for OpenGate {
    fn is_granted(&self, _capability: &str) -> bool {
        true
    }

    fn request(&self, _capability: &str) {}
}
