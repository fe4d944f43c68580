//! Durable key-value storage for cache blobs
//!
//! Provides the [`KeyValueStore`] trait the persistence bridge writes
//! through, plus a filesystem implementation storing one JSON blob per key
//! in an XDG-compliant cache directory and an in-memory implementation for
//! tests and for hosts without a resolvable home directory.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// A synchronous string-blob store, durable across restarts
///
/// Values are opaque serialized blobs; the bridge owns their format.
/// `get` returns `None` for a missing or unreadable key.
pub trait KeyValueStore {
    /// Reads the blob stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;

    /// Removes every stored blob
    fn clear(&self);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).set(key, value)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Filesystem-backed store
///
/// Each key is stored as `<key>.json` under an XDG-compliant cache
/// directory (`~/.cache/hullwatch/` on Linux). Unreadable or missing files
/// behave as absent keys.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where blobs are stored
    store_dir: PathBuf,
}

impl FileStore {
    /// Creates a new FileStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g.,
    /// no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "hullwatch")?;
        let store_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { store_dir })
    }

    /// Creates a new FileStore with a custom directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(store_dir: PathBuf) -> Self {
        Self { store_dir }
    }

    /// Returns the path to the blob file for the given key
    fn blob_path(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", key))
    }

    /// Ensures the storage directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.store_dir)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.blob_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.ensure_dir()?;
        fs::write(self.blob_path(key), value)
    }

    fn clear(&self) {
        let Ok(entries) = fs::read_dir(&self.store_dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let _ = fs::remove_file(path);
            }
        }
    }
}

/// In-memory store
///
/// Non-durable; used by tests and as a fallback when no filesystem
/// location is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.blobs.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.clear();
        }
    }
}
