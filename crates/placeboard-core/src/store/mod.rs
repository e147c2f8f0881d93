//! Durable key/value storage.
//!
//! This module provides the `KeyValueStore` trait the cache and the storage
//! guard both address, plus two implementations:
//! - `FileStore`: a JSON object file under the cache directory
//! - `MemoryStore`: process-local, for tests and `--ephemeral` runs
//!
//! Once the guard is installed, writers only ever see a `GuardedStore`.

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::guard::GuardedStore;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to serialize storage: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Enumerate every key currently held
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Returns the guard if this store already is one
    fn as_guarded(&self) -> Option<GuardedStore> {
        None
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }

    fn as_guarded(&self) -> Option<GuardedStore> {
        (**self).as_guarded()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }

    fn as_guarded(&self) -> Option<GuardedStore> {
        (**self).as_guarded()
    }
}
