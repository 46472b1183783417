//! # JSON file-backed state store.
//!
//! Persists the flag as a one-key document: `{"connected": true}`. Only the
//! key name and the boolean semantics are load-bearing; the container is
//! plain JSON so hosts can inspect or migrate it trivially.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::StateStore;

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    connected: bool,
}

/// File-backed [`StateStore`].
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the given path. The file is created on first
    /// write; a missing file reads as `false`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<bool, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let record: Record = serde_json::from_str(&raw)?;
        Ok(record.connected)
    }

    fn store(&self, connected: bool) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(&Record { connected })?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("link.json"));
        assert!(!store.load().unwrap());
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("link.json"));

        store.store(true).unwrap();
        assert!(store.load().unwrap());

        store.store(false).unwrap();
        assert!(!store.load().unwrap());
    }

    #[test]
    fn record_shape_is_the_connected_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("link.json");
        let store = JsonFileStore::new(&path);

        store.store(true).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"connected":true}"#);
    }

    #[test]
    fn garbage_record_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("link.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
    }
}
