//! Resource cache for the shared reference data every page reads.
//!
//! This module provides the `CacheManager`, which serves each resource kind
//! from memory, then the durable store, then the network, and makes sure at
//! most one network fetch per kind is outstanding at a time.
//!
//! There is no time-based expiry. Entries stay fresh until `invalidate` is
//! called (after a bulk upload, or on logout), except that `dashboard` and
//! `years` refresh themselves in the background when served from the durable
//! store.

pub mod entry;
pub mod error;
pub mod manager;
pub mod status;

use std::collections::HashMap;
use std::time::Duration;

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::kinds::ResourceKind;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use manager::CacheManager;
pub use status::{CacheStatus, KindStatus};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    fetch_timeout: Duration,
    kind_timeouts: HashMap<ResourceKind, Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }
}

impl CacheConfig {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            fetch_timeout,
            kind_timeouts: HashMap::new(),
        }
    }

    pub fn with_kind_timeout(mut self, kind: ResourceKind, timeout: Duration) -> Self {
        self.kind_timeouts.insert(kind, timeout);
        self
    }

    /// How long an in-flight fetch for `kind` may run before it is rejected
    pub fn timeout_for(&self, kind: ResourceKind) -> Duration {
        self.kind_timeouts
            .get(&kind)
            .copied()
            .unwrap_or(self.fetch_timeout)
    }
}
