//! # In-memory state store.
//!
//! Keeps the flag in an atomic. Nothing survives the process, which is
//! exactly what demos and tests want; the write counter lets tests assert
//! that an operation did (or did not) touch the store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::StoreError;

use super::StateStore;

/// Volatile [`StateStore`].
#[derive(Default)]
pub struct MemoryStore {
    connected: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates a store seeded with the given flag.
    pub fn with_flag(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `store()` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<bool, StoreError> {
        Ok(self.connected.load(Ordering::SeqCst))
    }

    fn store(&self, connected: bool) -> Result<(), StoreError> {
        self.connected.store(connected, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
