use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::patterns::{classify_for_write, KeyClass};
use super::GuardSink;
use crate::store::{KeyValueStore, StoreError};

/// Durable store wrapped by the write guard.
///
/// Only `install` constructs one, and it takes ownership of the underlying
/// store, so nothing downstream holds an unguarded write path. Cloning is
/// cheap and shares the same store.
#[derive(Clone)]
pub struct GuardedStore {
    inner: Arc<GuardInner>,
}

struct GuardInner {
    store: Box<dyn KeyValueStore>,
    sink: Arc<dyn GuardSink>,
}

impl fmt::Debug for GuardedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedStore").finish_non_exhaustive()
    }
}

/// Install the write guard over `store`.
///
/// Installing over a store that is already guarded returns that guard
/// unchanged instead of wrapping it twice.
pub fn install<S>(store: S, sink: Arc<dyn GuardSink>) -> GuardedStore
where
    S: KeyValueStore + 'static,
{
    if let Some(existing) = store.as_guarded() {
        debug!("Storage guard already installed");
        return existing;
    }
    debug!("Installing storage guard");
    GuardedStore {
        inner: Arc::new(GuardInner {
            store: Box::new(store),
            sink,
        }),
    }
}

impl KeyValueStore for GuardedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.store.get(key)
    }

    /// Blocked keys are dropped and reported to the sink; the caller still
    /// sees `Ok(())`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match classify_for_write(key) {
            KeyClass::Blocked => {
                self.inner.sink.write_blocked(key);
                Ok(())
            }
            KeyClass::Allowed | KeyClass::Unclassified => self.inner.store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.store.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.inner.store.keys()
    }

    fn as_guarded(&self) -> Option<GuardedStore> {
        Some(self.clone())
    }
}
