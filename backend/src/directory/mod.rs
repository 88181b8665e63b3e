//! External collaborator interfaces
//!
//! The ledger core does not own student identity or the school calendar; it
//! consumes them through these traits. `StaticDirectory` is a serde-loadable
//! in-memory implementation used by the API server and tests; production
//! deployments substitute an adapter over the real student directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::AcademicYear;

/// Student directory lookup: does this student exist in this school?
pub trait StudentDirectory: Send + Sync {
    fn student_exists(&self, school_id: &str, student_id: &str) -> bool;
}

/// School calendar configuration: the school's current academic year
pub trait SchoolCalendar: Send + Sync {
    fn current_academic_year(&self, school_id: &str) -> Option<AcademicYear>;
}

/// Per-school seed data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolSeed {
    /// Current academic year used for the previous/current dues split
    pub current_academic_year: AcademicYear,
    /// Known student IDs
    pub students: Vec<String>,
}

/// In-memory implementation of both collaborator traits
///
/// # Example
/// ```
/// use fee_ledger_core_rs::directory::{StaticDirectory, StudentDirectory};
/// use fee_ledger_core_rs::models::AcademicYear;
///
/// let mut directory = StaticDirectory::new();
/// directory.add_school("SCH_01", AcademicYear::parse("2023-24").unwrap());
/// directory.add_student("SCH_01", "STU_001");
///
/// assert!(directory.student_exists("SCH_01", "STU_001"));
/// assert!(!directory.student_exists("SCH_01", "STU_999"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticDirectory {
    schools: HashMap<String, SchoolSeed>,
}

impl StaticDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a school with its current academic year
    pub fn add_school(&mut self, school_id: &str, current_academic_year: AcademicYear) {
        self.schools
            .entry(school_id.to_string())
            .and_modify(|seed| seed.current_academic_year = current_academic_year.clone())
            .or_insert_with(|| SchoolSeed {
                current_academic_year,
                students: Vec::new(),
            });
    }

    /// Register a student in a school (the school must exist)
    pub fn add_student(&mut self, school_id: &str, student_id: &str) {
        if let Some(seed) = self.schools.get_mut(school_id) {
            if !seed.students.iter().any(|s| s == student_id) {
                seed.students.push(student_id.to_string());
            }
        }
    }

    /// Load a directory from a JSON seed document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of schools registered
    pub fn school_count(&self) -> usize {
        self.schools.len()
    }
}

impl StudentDirectory for StaticDirectory {
    fn student_exists(&self, school_id: &str, student_id: &str) -> bool {
        self.schools
            .get(school_id)
            .map(|seed| seed.students.iter().any(|s| s == student_id))
            .unwrap_or(false)
    }
}

impl SchoolCalendar for StaticDirectory {
    fn current_academic_year(&self, school_id: &str) -> Option<AcademicYear> {
        self.schools
            .get(school_id)
            .map(|seed| seed.current_academic_year.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(token: &str) -> AcademicYear {
        AcademicYear::parse(token).unwrap()
    }

    #[test]
    fn test_lookup_and_calendar() {
        let mut directory = StaticDirectory::new();
        directory.add_school("SCH_01", year("2023-24"));
        directory.add_student("SCH_01", "STU_001");

        assert!(directory.student_exists("SCH_01", "STU_001"));
        assert!(!directory.student_exists("SCH_01", "STU_002"));
        assert!(!directory.student_exists("SCH_02", "STU_001"));

        assert_eq!(
            directory.current_academic_year("SCH_01"),
            Some(year("2023-24"))
        );
        assert_eq!(directory.current_academic_year("SCH_02"), None);
    }

    #[test]
    fn test_add_student_requires_school() {
        let mut directory = StaticDirectory::new();
        directory.add_student("SCH_01", "STU_001");
        assert!(!directory.student_exists("SCH_01", "STU_001"));
    }

    #[test]
    fn test_from_json_seed() {
        let json = r#"{
            "schools": {
                "SCH_01": {
                    "current_academic_year": "2023-24",
                    "students": ["STU_001", "STU_002"]
                }
            }
        }"#;

        let directory = StaticDirectory::from_json(json).unwrap();
        assert_eq!(directory.school_count(), 1);
        assert!(directory.student_exists("SCH_01", "STU_002"));
        assert_eq!(
            directory.current_academic_year("SCH_01"),
            Some(year("2023-24"))
        );
    }
}
