use std::time::Duration;

use thiserror::Error;

use crate::kinds::ResourceKind;

/// Why a resource could not be served.
///
/// `Clone` because one outcome is handed to every caller waiting on the same
/// in-flight fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Failed to fetch {kind}: {message}")]
    Fetch { kind: ResourceKind, message: String },

    #[error("Fetching {kind} timed out after {after:?}")]
    Timeout { kind: ResourceKind, after: Duration },

    #[error("Fetch task for {kind} failed: {message}")]
    TaskFailed { kind: ResourceKind, message: String },

    #[error("Expected {kind} data, got {actual}")]
    UnexpectedPayload {
        kind: ResourceKind,
        actual: ResourceKind,
    },
}
