use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    pub year: i32,
    #[serde(rename = "studentsPlaced", default)]
    pub students_placed: u32,
    #[serde(default)]
    pub offers: u32,
    /// Average package in LPA
    #[serde(rename = "avgPackage")]
    pub avg_package: Option<f64>,
    #[serde(rename = "maxPackage")]
    pub max_package: Option<f64>,
}

impl CompanySummary {
    pub fn package_display(&self) -> String {
        match self.avg_package {
            Some(pkg) => format!("{:.1} LPA", pkg),
            None => "N/A".to_string(),
        }
    }
}

/// One selection round of a company's drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub company: String,
    pub year: i32,
    #[serde(rename = "roundName")]
    pub round_name: String,
    #[serde(rename = "roundNumber", default)]
    pub round_number: u32,
    #[serde(rename = "studentsCleared", default)]
    pub students_cleared: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_summary() {
        let json = r#"{"name":"Acme","year":2024,"studentsPlaced":12,"offers":14,"avgPackage":8.34,"maxPackage":null}"#;
        let company: CompanySummary = serde_json::from_str(json).expect("parse company");
        assert_eq!(company.name, "Acme");
        assert_eq!(company.students_placed, 12);
        assert_eq!(company.package_display(), "8.3 LPA");
        assert_eq!(company.max_package, None);
    }

    #[test]
    fn test_parse_round_defaults() {
        let json = r#"{"company":"Acme","year":2023,"roundName":"Aptitude"}"#;
        let round: Round = serde_json::from_str(json).expect("parse round");
        assert_eq!(round.round_number, 0);
        assert_eq!(round.students_cleared, 0);
    }
}
