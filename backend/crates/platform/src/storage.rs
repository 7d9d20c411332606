//! Local Key/Value Store
//!
//! A string-to-string map with the same contract as browser local storage:
//! fixed string keys, JSON-serialized values, no schema versioning. When a
//! file path is given, every write rewrites the whole file; otherwise the
//! store lives only in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is not a JSON object: {source}")]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The stored value under `key` does not deserialize into the requested type
    #[error("Value under key '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON key/value store
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    items: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (or create on first write) a file-backed store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let items = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StorageError::CorruptFile {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = items.len(), "Opened local store");

        Ok(Self {
            path: Some(path),
            items: RwLock::new(items),
        })
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Store a value. On a failed write the previous contents stay visible.
    pub fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut items = self.write();
        let mut next = items.clone();
        next.insert(key.to_string(), value.into());
        self.flush(&next)?;
        *items = next;
        Ok(())
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        let mut items = self.write();
        if !items.contains_key(key) {
            return Ok(false);
        }
        let mut next = items.clone();
        next.remove(key);
        self.flush(&next)?;
        *items = next;
        Ok(true)
    }

    /// Read and deserialize a JSON value
    ///
    /// `Ok(None)` when the key is absent; [`StorageError::Malformed`] when it
    /// is present but does not parse.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.get_item(key) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            })
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set_item(key, raw)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Rewrite the backing file through a temp file + rename
    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let contents = serde_json::to_string_pretty(items).map_err(|source| {
            StorageError::Serialize {
                key: "*".to_string(),
                source,
            }
        })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })
    }
}
