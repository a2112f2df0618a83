#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flat key-value persistence for player progress.
//!
//! Every record lives under its own key and is read and written
//! independently. Values are JSON documents produced by [`save_json`] and
//! consumed by [`load_json`]; callers decide how to recover from failures.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Key holding the cumulative statistics snapshot.
pub const STATS_KEY: &str = "mira_game_stats";
/// Key holding the ordered list of unlocked achievement ids.
pub const ACHIEVEMENTS_KEY: &str = "mira_achievements";
/// Key holding the longest combo ever reached.
pub const MAX_COMBO_KEY: &str = "mira_max_combo";
/// Key holding the pending kill counter.
pub const PENDING_KILLS_KEY: &str = "mira_kills_pending";
/// Key holding the preferred wallet kind.
pub const WALLET_PREFERENCE_KEY: &str = "walletPreference";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be used at all.
    #[error("storage is unavailable")]
    Unavailable,
    /// The key contains characters the backend cannot represent.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    /// Reading or writing the backing medium failed.
    #[error("could not access '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A value could not be encoded or decoded.
    #[error("could not encode or decode '{key}': {source}")]
    Format {
        /// Key being accessed.
        key: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Flat string-to-string store with independently addressable records.
pub trait KeyValueStore {
    /// Reads the raw value stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the value stored under `key`. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Reads and decodes the JSON value stored under `key`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.read(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Format {
            key: key.to_owned(),
            source,
        })
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Format {
        key: key.to_owned(),
        source,
    })?;
    store.write(key, &encoded)
}

/// In-memory store used by tests and by reload simulations.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every operation fails, mimicking disabled storage.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: true,
        }
    }

    /// Toggles whether operations fail.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        let _ = self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        let _ = self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store that keeps each key in `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory when needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        log::debug!("opened file store at {}", root.display());
        Ok(Self { root })
    }

    /// Directory holding the records.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::write(&path, value).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}
