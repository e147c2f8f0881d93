use tracing::{info, warn};

use super::SweepReport;
use crate::store::StoreError;

/// Receives guard events. Keys are reported, values never are.
pub trait GuardSink: Send + Sync {
    /// A write to `key` was discarded
    fn write_blocked(&self, key: &str);

    fn sweep_completed(&self, report: &SweepReport);

    fn sweep_failed(&self, error: &StoreError);
}

/// Default sink, forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl GuardSink for TracingSink {
    fn write_blocked(&self, key: &str) {
        warn!(key = key, "Blocked write of sensitive key to durable storage");
    }

    fn sweep_completed(&self, report: &SweepReport) {
        if report.removed() > 0 {
            info!(removed = report.removed(), keys = ?report.removed_keys, "Removed sensitive keys from durable storage");
        }
    }

    fn sweep_failed(&self, error: &StoreError) {
        warn!(error = %error, "Storage sweep failed, continuing without it");
    }
}
