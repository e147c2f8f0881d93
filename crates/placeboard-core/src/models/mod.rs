//! Data models for placement analytics.
//!
//! This module contains the payloads served by the resource cache:
//!
//! - `CompanySummary`, `Round`: recruiter statistics and selection rounds
//! - `Student`, `StudentRef`: student records and the lightweight roster form
//! - `DashboardStats`: the headline numbers on the landing page
//! - `ResourceData`: one variant per resource kind

pub mod company;
pub mod dashboard;
pub mod resource;
pub mod student;

pub use company::{CompanySummary, Round};
pub use dashboard::DashboardStats;
pub use resource::ResourceData;
pub use student::{Offer, PlacementStatus, Student, StudentRef};
