use crate::kinds::ResourceKind;

/// Where one kind currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindStatus {
    pub kind: ResourceKind,
    pub in_memory: bool,
    pub in_flight: bool,
    pub durable: bool,
    /// Age of the in-memory entry, e.g. "5m ago"
    pub age: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStatus {
    pub kinds: Vec<KindStatus>,
}

impl CacheStatus {
    pub fn get(&self, kind: ResourceKind) -> Option<&KindStatus> {
        self.kinds.iter().find(|s| s.kind == kind)
    }

    /// Age of the first kind held in memory, or "never"
    pub fn last_updated(&self) -> String {
        self.kinds
            .iter()
            .find_map(|s| s.age.clone())
            .unwrap_or_else(|| "never".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(kind: ResourceKind, age: Option<&str>) -> KindStatus {
        KindStatus {
            kind,
            in_memory: age.is_some(),
            in_flight: false,
            durable: false,
            age: age.map(str::to_string),
        }
    }

    #[test]
    fn test_last_updated() {
        let cache_status = CacheStatus {
            kinds: vec![
                status(ResourceKind::Companies, None),
                status(ResourceKind::Years, Some("5m ago")),
            ],
        };
        assert_eq!(cache_status.last_updated(), "5m ago");
        assert!(cache_status.get(ResourceKind::Years).unwrap().in_memory);
        assert!(cache_status.get(ResourceKind::Rounds).is_none());
    }

    #[test]
    fn test_last_updated_empty() {
        assert_eq!(CacheStatus::default().last_updated(), "never");
    }
}
