use serde::{Deserialize, Serialize};

/// Roster entry used by pickers and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRef {
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    pub name: String,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Placed,
    #[default]
    Unplaced,
    Opted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub company: String,
    pub year: i32,
    pub package: Option<f64>,
}

/// Full student record, as shown on the student detail and leaderboard pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    pub name: String,
    pub branch: Option<String>,
    #[serde(rename = "batchYear")]
    pub batch_year: Option<i32>,
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub status: PlacementStatus,
    #[serde(default)]
    pub offers: Vec<Offer>,
}

impl Student {
    /// Highest offered package across all offers
    pub fn best_package(&self) -> Option<f64> {
        self.offers
            .iter()
            .filter_map(|o| o.package)
            .fold(None, |best, pkg| match best {
                Some(b) if b >= pkg => Some(b),
                _ => Some(pkg),
            })
    }

    pub fn to_ref(&self) -> StudentRef {
        StudentRef {
            roll_no: self.roll_no.clone(),
            name: self.name.clone(),
            branch: self.branch.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_package() {
        let student = Student {
            roll_no: "21CS001".to_string(),
            name: "Asha".to_string(),
            branch: Some("CSE".to_string()),
            batch_year: Some(2025),
            cgpa: Some(8.9),
            status: PlacementStatus::Placed,
            offers: vec![
                Offer { company: "Acme".to_string(), year: 2024, package: Some(6.0) },
                Offer { company: "Globex".to_string(), year: 2024, package: Some(12.5) },
                Offer { company: "Initech".to_string(), year: 2024, package: None },
            ],
        };
        assert_eq!(student.best_package(), Some(12.5));
        assert_eq!(student.to_ref().roll_no, "21CS001");
    }

    #[test]
    fn test_status_defaults_to_unplaced() {
        let json = r#"{"rollNo":"21EC010","name":"Ravi","branch":null,"batchYear":null,"cgpa":null}"#;
        let student: Student = serde_json::from_str(json).expect("parse student");
        assert_eq!(student.status, PlacementStatus::Unplaced);
        assert!(student.offers.is_empty());
        assert_eq!(student.best_package(), None);
    }
}
