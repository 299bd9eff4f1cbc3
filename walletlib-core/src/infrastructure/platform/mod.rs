//! Platform key-value storage
//!
//! Local string-keyed storage used by the key-value wallet repository.
//! `DirectoryStore` keeps one file per key under the OS data directory;
//! `MemoryStore` keeps everything in process.

use crate::shared::constants::{DATA_DIR_NAME, FALLBACK_DATA_DIR, KEY_VALUE_EXTENSION};
use crate::shared::error::WalletError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Platform-specific key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Store a value under `key`, replacing any previous value
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError>;

    /// Retrieve the value stored under `key`
    fn retrieve(&self, key: &str) -> Result<Vec<u8>, WalletError>;

    /// Delete the value stored under `key`
    fn delete(&self, key: &str) -> Result<(), WalletError>;

    /// Check if `key` holds a value
    fn exists(&self, key: &str) -> Result<bool, WalletError>;
}

/// In-process key-value store
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError> {
        self.data().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>, WalletError> {
        self.data()
            .get(key)
            .cloned()
            .ok_or_else(|| WalletError::wallet_not_found(format!("No value stored under {}", key)))
    }

    fn delete(&self, key: &str) -> Result<(), WalletError> {
        self.data().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, WalletError> {
        Ok(self.data().contains_key(key))
    }
}

/// Key-value store keeping one file per key in a directory
pub struct DirectoryStore {
    base_dir: PathBuf,
}

impl DirectoryStore {
    /// Store under the OS data directory (`<data_dir>/walletlib`)
    pub fn new() -> Result<Self, WalletError> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
            .join(DATA_DIR_NAME);
        Self::at(base_dir)
    }

    /// Store under an explicit directory, created if missing
    pub fn at(base_dir: impl Into<PathBuf>) -> Result<Self, WalletError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| {
            WalletError::storage(format!(
                "Failed to create {}: {}",
                base_dir.display(),
                e
            ))
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // Helper: Get file path for a given key
    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", key, KEY_VALUE_EXTENSION))
    }
}

impl KeyValueStore for DirectoryStore {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError> {
        fs::write(self.file_path(key), data)?;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>, WalletError> {
        Ok(fs::read(self.file_path(key))?)
    }

    fn delete(&self, key: &str) -> Result<(), WalletError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, WalletError> {
        Ok(self.file_path(key).exists())
    }
}
