use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
}

/// Durable string key-value storage with synchronous get/set.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!("Store miss: {} ({:?} does not exist)", key, path);
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        debug!("Store write: {} ({} bytes)", key, value.len());
        Ok(())
    }
}

/// In-process store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load/save a whole `Vec<T>` as JSON under a single key.
///
/// Loading never fails: a missing, unreadable, or malformed value is logged and
/// treated as an empty list.
pub struct PersistentList<T> {
    store: Arc<dyn KeyValueStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistentList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn load(&self, key: &str) -> Vec<T> {
        let content = match self.store.get(key) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read stored list {}: {}. Starting empty.", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&content) {
            Ok(items) => {
                debug!("Loaded {} items from {}", items.len(), key);
                items
            }
            Err(e) => {
                warn!("Stored list {} is corrupt: {}. Starting empty.", key, e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, &json)
    }
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_missing_key_loads_empty() {
        let list: PersistentList<u32> = PersistentList::new(Arc::new(MemoryStore::new()));
        assert!(list.load("watched").is_empty());
    }

    #[test]
    fn test_memory_store_save_then_load() {
        let store = MemoryStore::new();
        let list: PersistentList<String> = PersistentList::new(Arc::new(store.clone()));
        list.save("names", &["a".to_string(), "b".to_string()]).unwrap();

        // A second list over the same store sees the same data
        let other: PersistentList<String> = PersistentList::new(Arc::new(store));
        assert_eq!(other.load("names"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_malformed_value_loads_empty() {
        let store = MemoryStore::new();
        store.set("watched", "{not json").unwrap();
        let list: PersistentList<u32> = PersistentList::new(Arc::new(store));
        assert!(list.load("watched").is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let store = MemoryStore::new();
        store.set("watched", r#"{"imdbID":"tt1"}"#).unwrap();
        let list: PersistentList<u32> = PersistentList::new(Arc::new(store));
        assert!(list.load("watched").is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("watched").unwrap(), None);

        store.set("watched", "[1,2,3]").unwrap();
        assert_eq!(store.get("watched").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("watched.json").exists());
        assert!(!dir.path().join("watched.json.tmp").exists());

        store.set("watched", "[]").unwrap();
        assert_eq!(store.get("watched").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.set("../escape", "x"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("store"));
        store.set("watched", "[]").unwrap();
        assert_eq!(store.get("watched").unwrap().as_deref(), Some("[]"));
    }
}
