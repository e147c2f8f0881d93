use serde::{Deserialize, Serialize};

/// Headline numbers for the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    #[serde(rename = "totalStudents", default)]
    pub total_students: u32,
    #[serde(rename = "placedStudents", default)]
    pub placed_students: u32,
    #[serde(rename = "totalCompanies", default)]
    pub total_companies: u32,
    #[serde(rename = "totalOffers", default)]
    pub total_offers: u32,
    #[serde(rename = "highestPackage")]
    pub highest_package: Option<f64>,
    #[serde(rename = "averagePackage")]
    pub average_package: Option<f64>,
}

impl DashboardStats {
    /// Percentage of students placed, 0.0 when there are no students
    pub fn placement_rate(&self) -> f64 {
        if self.total_students == 0 {
            0.0
        } else {
            f64::from(self.placed_students) * 100.0 / f64::from(self.total_students)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_rate() {
        let stats = DashboardStats {
            total_students: 200,
            placed_students: 150,
            ..Default::default()
        };
        assert!((stats.placement_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(DashboardStats::default().placement_rate(), 0.0);
    }
}
