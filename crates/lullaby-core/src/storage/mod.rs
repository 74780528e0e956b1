//! Persistence ports and adapters.
//!
//! The night program engine only sees the [`KvStore`] trait: string keys,
//! JSON string values, last write wins. [`Database`] backs it with SQLite on
//! disk; [`MemoryStore`] keeps everything in process.

mod config;
pub mod database;

pub use config::{Config, CountdownConfig, DisplayConfig, ProgramConfig};
pub use database::Database;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Opaque key-value persistence used by the engine.
pub trait KvStore {
    /// Read the value stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `LULLABY_DATA_DIR` wins when set. Otherwise `~/.config/lullaby`, or
/// `~/.config/lullaby-dev` when `LULLABY_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("LULLABY_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LULLABY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lullaby-dev")
            } else {
                base_dir.join("lullaby")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip_and_remove() {
        let store = MemoryStore::new();
        assert!(store.load("k").unwrap().is_none());
        store.save("k", "v1").unwrap();
        store.save("k", "v2").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn borrowed_store_is_a_store() {
        fn write<S: KvStore>(s: S) {
            s.save("a", "1").unwrap();
        }
        let store = MemoryStore::new();
        write(&store);
        assert_eq!(store.len(), 1);
    }
}
