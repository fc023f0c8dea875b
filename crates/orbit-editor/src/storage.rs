//! Durable key-value slots for the persisted layout.
//!
//! The engine only needs three operations on one key. Every backend must
//! make `write` atomic from the caller's point of view: it either fully
//! replaces the value or returns an error and leaves the old value intact.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The medium is disabled or missing (private browsing, no window, …).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait StorageBackend {
    /// Read the value under `key`, `Ok(None)` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ─── In-memory ───────────────────────────────────────────────────────────

/// Process-local storage. Used for hosts without durable storage and in
/// tests, where it can also simulate an unavailable medium.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    unavailable: bool,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one slot.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.slots.insert(key.to_string(), value.to_string());
        storage
    }

    /// Make every write and remove fail, like a full or disabled store.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::QuotaExceeded);
        }
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("memory storage disabled".into()));
        }
        self.slots.remove(key);
        Ok(())
    }
}

// ─── File ────────────────────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{StorageBackend, StorageError};
    use std::fs;
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};

    /// One JSON file per key inside a directory.
    ///
    /// Writes go to a temp file that is then renamed over the target, so a
    /// crash mid-write never leaves a truncated layout behind.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        /// The directory must already exist.
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                && !key.starts_with('.');
            if !valid {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    impl StorageBackend for FileStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path_for(key)?) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let path = self.path_for(key)?;
            let tmp = path.with_extension("json.tmp");
            let result = (|| {
                let mut file = fs::File::create(&tmp)?;
                file.write_all(value.as_bytes())?;
                file.sync_all()?;
                fs::rename(&tmp, &path)
            })();
            if result.is_err() {
                let _ = fs::remove_file(&tmp);
            }
            result.map_err(StorageError::from)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path_for(key)?) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}
