use serde::Serialize;

use super::{CompanySummary, DashboardStats, Round, Student, StudentRef};
use crate::kinds::ResourceKind;

/// A cached payload, one variant per resource kind.
///
/// Only the payload is persisted; `to_json` of `Years(vec![2023, 2024])` is
/// `[2023,2024]`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    Companies(Vec<String>),
    Years(Vec<i32>),
    Students(Vec<StudentRef>),
    AllStudents(Vec<Student>),
    AllCompanies(Vec<CompanySummary>),
    Rounds(Vec<Round>),
    Dashboard(DashboardStats),
}

impl ResourceData {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceData::Companies(_) => ResourceKind::Companies,
            ResourceData::Years(_) => ResourceKind::Years,
            ResourceData::Students(_) => ResourceKind::Students,
            ResourceData::AllStudents(_) => ResourceKind::AllStudents,
            ResourceData::AllCompanies(_) => ResourceKind::AllCompanies,
            ResourceData::Rounds(_) => ResourceKind::Rounds,
            ResourceData::Dashboard(_) => ResourceKind::Dashboard,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            ResourceData::Companies(v) => serde_json::to_string(v),
            ResourceData::Years(v) => serde_json::to_string(v),
            ResourceData::Students(v) => serde_json::to_string(v),
            ResourceData::AllStudents(v) => serde_json::to_string(v),
            ResourceData::AllCompanies(v) => serde_json::to_string(v),
            ResourceData::Rounds(v) => serde_json::to_string(v),
            ResourceData::Dashboard(v) => serde_json::to_string(v),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        fn pretty<T: Serialize>(v: &T) -> serde_json::Result<String> {
            serde_json::to_string_pretty(v)
        }
        match self {
            ResourceData::Companies(v) => pretty(v),
            ResourceData::Years(v) => pretty(v),
            ResourceData::Students(v) => pretty(v),
            ResourceData::AllStudents(v) => pretty(v),
            ResourceData::AllCompanies(v) => pretty(v),
            ResourceData::Rounds(v) => pretty(v),
            ResourceData::Dashboard(v) => pretty(v),
        }
    }

    /// Parse a payload for `kind` from its serialized form.
    pub fn from_json(kind: ResourceKind, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            ResourceKind::Companies => ResourceData::Companies(serde_json::from_str(json)?),
            ResourceKind::Years => ResourceData::Years(serde_json::from_str(json)?),
            ResourceKind::Students => ResourceData::Students(serde_json::from_str(json)?),
            ResourceKind::AllStudents => ResourceData::AllStudents(serde_json::from_str(json)?),
            ResourceKind::AllCompanies => ResourceData::AllCompanies(serde_json::from_str(json)?),
            ResourceKind::Rounds => ResourceData::Rounds(serde_json::from_str(json)?),
            ResourceKind::Dashboard => ResourceData::Dashboard(serde_json::from_str(json)?),
        })
    }

    /// Number of items in a list payload, `None` for the dashboard
    pub fn item_count(&self) -> Option<usize> {
        match self {
            ResourceData::Companies(v) => Some(v.len()),
            ResourceData::Years(v) => Some(v.len()),
            ResourceData::Students(v) => Some(v.len()),
            ResourceData::AllStudents(v) => Some(v.len()),
            ResourceData::AllCompanies(v) => Some(v.len()),
            ResourceData::Rounds(v) => Some(v.len()),
            ResourceData::Dashboard(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_serialize_as_bare_array() {
        let data = ResourceData::Years(vec![2023, 2024]);
        assert_eq!(data.to_json().unwrap(), "[2023,2024]");
    }

    #[test]
    fn test_from_json_uses_kind() {
        let data = ResourceData::from_json(ResourceKind::Companies, r#"["Acme","Globex"]"#).unwrap();
        assert_eq!(data.kind(), ResourceKind::Companies);
        assert_eq!(data.item_count(), Some(2));

        // Same text, wrong shape for the kind
        assert!(ResourceData::from_json(ResourceKind::Years, r#"["Acme","Globex"]"#).is_err());
        assert!(ResourceData::from_json(ResourceKind::Dashboard, "not json").is_err());
    }

    #[test]
    fn test_dashboard_round_trip_equality() {
        let data = ResourceData::Dashboard(DashboardStats {
            total_students: 10,
            placed_students: 4,
            total_companies: 3,
            total_offers: 5,
            highest_package: Some(20.0),
            average_package: Some(7.5),
        });
        let parsed = ResourceData::from_json(ResourceKind::Dashboard, &data.to_json().unwrap()).unwrap();
        assert_eq!(parsed, data);
        assert_eq!(parsed.item_count(), None);
    }
}
