//! Storage guard keeping authentication material out of durable storage.
//!
//! Two cooperating pieces:
//! - `sweep`: runs once at startup and deletes existing keys that look like
//!   credentials or session state
//! - `install`: wraps the durable store so that every later write is
//!   classified, and sensitive writes are silently dropped
//!
//! `bootstrap` does both, in that order, and is what the application calls
//! before constructing the cache manager.

pub mod guarded;
pub mod patterns;
pub mod sink;
pub mod sweep;

use std::sync::Arc;

use crate::store::KeyValueStore;

pub use guarded::{install, GuardedStore};
pub use patterns::{classify_for_sweep, classify_for_write, is_allowed, KeyClass, ALLOWED_KEYS};
pub use sink::{GuardSink, TracingSink};
pub use sweep::{sweep, SweepReport};

/// Sweep `store`, then install the write guard over it.
///
/// A sweep failure is reported to `sink` and otherwise ignored: the guard is
/// still installed and startup continues.
pub fn bootstrap<S>(store: S, sink: Arc<dyn GuardSink>) -> (GuardedStore, Option<SweepReport>)
where
    S: KeyValueStore + 'static,
{
    let report = match sweep(&store, sink.as_ref()) {
        Ok(report) => Some(report),
        Err(e) => {
            sink.sweep_failed(&e);
            None
        }
    };
    (install(store, sink), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};

    /// Store whose enumeration always fails
    struct BrokenKeys(MemoryStore);

    impl KeyValueStore for BrokenKeys {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.0.remove(key)
        }
        fn keys(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Corrupt("unreadable".to_string()))
        }
    }

    #[test]
    fn test_bootstrap_sweeps_then_guards() {
        let raw = Arc::new(MemoryStore::with_entries([
            ("sb-session", "xyz"),
            ("theme", "dark"),
            ("cache_years", "[2023,2024]"),
        ]));
        let (guarded, report) = bootstrap(Arc::clone(&raw), Arc::new(TracingSink));

        assert_eq!(report.map(|r| r.removed()), Some(1));
        guarded.set("jwt", "abc").unwrap();
        assert_eq!(raw.get("jwt").unwrap(), None);
    }

    #[test]
    fn test_bootstrap_survives_sweep_failure() {
        let inner = MemoryStore::with_entries([("auth_token", "secret")]);
        let (guarded, report) = bootstrap(BrokenKeys(inner), Arc::new(TracingSink));

        assert!(report.is_none());
        // Guard is active even though the sweep never ran
        guarded.set("refresh_token", "r").unwrap();
        assert_eq!(guarded.get("refresh_token").unwrap(), None);
        guarded.set("cache_rounds", "[]").unwrap();
        assert_eq!(guarded.get("cache_rounds").unwrap().as_deref(), Some("[]"));
    }
}
