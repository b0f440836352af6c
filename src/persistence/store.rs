use super::files::{atomic_write, ensure_dir, read_file};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Keys of the persisted documents
pub mod keys {
    pub const GRAPH: &str = "graph";
    pub const FOCUS_SESSION: &str = "focus_session";
    pub const POMODORO_SESSION: &str = "pomodoro_session";
    pub const DAILY_STATS: &str = "daily_stats";
    pub const DAY_CHANGE_DETECTOR: &str = "day_change_detector";
    pub const DAILY_PLANNING: &str = "daily_planning";
    pub const ANALYTICS: &str = "analytics";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),
    #[error("failed to write {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value persistence
pub trait KeyValueStore {
    /// Stored value, or None when missing or unreadable
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match read_file(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(key, error = %err, "failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        ensure_dir(&self.dir)
            .and_then(|_| atomic_write(&path, value))
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })
    }
}

/// Decode a stored document, falling back to the default when it is missing or corrupt
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key) else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "stored value is corrupt, using defaults");
            T::default()
        }
    }
}

/// Encode and store a document
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Store a document, logging instead of failing
pub fn save_or_warn<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(err) = save_json(store, key, value) {
        warn!(key, error = %err, "failed to persist");
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
