//! # Durable connection-intent store.
//!
//! [`StateStore`] persists exactly one boolean: whether a connection is
//! intended to be active. The supervisor reads it once at construction (to
//! decide whether to auto-resume after a process restart) and writes it
//! synchronously on every transition that changes the active/inactive
//! mapping — before control returns to the caller.

use crate::error::StoreError;

/// Durable single-boolean record.
pub trait StateStore: Send + Sync + 'static {
    /// Reads the persisted flag. A missing record reads as `false`.
    fn load(&self) -> Result<bool, StoreError>;

    /// Writes the flag. Must be durable by the time this returns.
    fn store(&self, connected: bool) -> Result<(), StoreError>;
}
