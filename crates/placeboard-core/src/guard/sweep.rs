use tracing::{debug, warn};

use super::patterns::{classify_for_sweep, KeyClass};
use super::GuardSink;
use crate::store::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed_keys: Vec<String>,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.removed_keys.len()
    }
}

/// Delete every existing key that matches a sensitive pattern and is not
/// allow-listed. Unknown keys that match nothing are left alone.
///
/// Fails only if the keys cannot be enumerated; a key that fails to delete is
/// logged and skipped.
pub fn sweep<S>(store: &S, sink: &dyn GuardSink) -> Result<SweepReport, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let keys = store.keys()?;
    debug!(keys = keys.len(), "Sweeping durable storage");

    let mut report = SweepReport::default();
    for key in keys {
        if classify_for_sweep(&key) != KeyClass::Blocked {
            continue;
        }
        match store.remove(&key) {
            Ok(()) => report.removed_keys.push(key),
            Err(e) => warn!(key = %key, error = %e, "Failed to remove sensitive key"),
        }
    }

    sink.sweep_completed(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::guard::TracingSink;
    use crate::store::MemoryStore;

    #[test]
    fn test_sweep_scenario() {
        let store = MemoryStore::with_entries([
            ("sb-session", "xyz"),
            ("theme", "dark"),
            ("cache_years", "[2023,2024]"),
        ]);

        let report = sweep(&store, &TracingSink).unwrap();
        assert_eq!(report.removed(), 1);
        assert_eq!(report.removed_keys, vec!["sb-session".to_string()]);

        let expected: BTreeMap<String, String> = [
            ("theme".to_string(), "dark".to_string()),
            ("cache_years".to_string(), "[2023,2024]".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(store.snapshot(), expected);
    }

    #[test]
    fn test_sweep_keeps_unknown_keys() {
        let store = MemoryStore::with_entries([
            ("language", "en"),
            ("accessToken", "a"),
            ("REFRESH", "r"),
            ("cache_dashboard_auth", "{}"),
        ]);

        let report = sweep(&store, &TracingSink).unwrap();
        assert_eq!(report.removed(), 2);
        assert_eq!(
            store.keys().unwrap(),
            vec!["cache_dashboard_auth".to_string(), "language".to_string()]
        );
    }

    #[test]
    fn test_sweep_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(sweep(&store, &TracingSink).unwrap(), SweepReport::default());
    }
}
