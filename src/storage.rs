//! Client-local persistence.
//!
//! The durable client state is a handful of small JSON blobs keyed by name.
//! [`ProfileStore`] keeps the medium swappable: the file store writes one
//! file per key under a profile directory, the memory store backs tests and
//! ephemeral profiles.

use std::{collections::HashMap, fs, io, path::PathBuf, sync::Mutex};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

/// Blob key for the bounded search history.
pub const HISTORY_KEY: &str = "history";
/// Blob key for the liked model names.
pub const LIKED_KEY: &str = "liked";
/// Blob key for the mock session.
pub const SESSION_KEY: &str = "session";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] io::Error),

    #[error("storage encode: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait ProfileStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed read. A blob that fails to decode is cleared and reported as
/// absent, so corrupt local state resets to empty instead of wedging the
/// app at startup.
pub fn load_json<T: DeserializeOwned>(store: &dyn ProfileStore, key: &str) -> Option<T> {
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored blob");
            return None;
        }
    };

    match serde_json::from_str(&blob) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding corrupt stored blob");
            let _ = store.clear(key);
            None
        }
    }
}

/// Typed write.
pub fn save_json<T: Serialize>(
    store: &dyn ProfileStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    store.save(key, &serde_json::to_string(value)?)
}

/// One JSON file per key under a profile directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the platform config directory,
    /// `~/.config/carconnect` on Linux.
    pub fn default_profile() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("carconnect")))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral profiles.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
