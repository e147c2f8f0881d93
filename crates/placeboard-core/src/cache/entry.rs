use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::kinds::ResourceKind;
use crate::models::ResourceData;

/// In-memory cache slot for one kind. At most one exists per kind.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub kind: ResourceKind,
    pub data: Arc<ResourceData>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(data: Arc<ResourceData>) -> Self {
        Self {
            kind: data.kind(),
            data,
            fetched_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.fetched_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry_aged(minutes: i64) -> CacheEntry {
        let mut entry = CacheEntry::new(Arc::new(ResourceData::Years(vec![2024])));
        entry.fetched_at = Utc::now() - Duration::minutes(minutes);
        entry
    }

    #[test]
    fn test_new_takes_kind_from_data() {
        let entry = CacheEntry::new(Arc::new(ResourceData::Companies(vec![])));
        assert_eq!(entry.kind, ResourceKind::Companies);
    }

    #[test]
    fn test_age_display() {
        assert_eq!(entry_aged(0).age_display(), "just now");
        assert_eq!(entry_aged(-5).age_display(), "just now");
        assert_eq!(entry_aged(5).age_display(), "5m ago");
        assert_eq!(entry_aged(125).age_display(), "2h ago");
        assert_eq!(entry_aged(3 * 1440 + 10).age_display(), "3d ago");
    }
}
