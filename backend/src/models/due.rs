//! Due line item model
//!
//! Represents one owed amount for one student, one academic year, and one
//! fee component. Line items are append-only: once created they are never
//! mutated or deleted, and corrections are expressed as new line items. This
//! preserves the audit history the rest of the engine folds over.
//!
//! CRITICAL: All money values are i64 (paise)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::year::AcademicYear;

/// Fee component a due line item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Tuition,
    Exam,
    Transport,
    Hostel,
    Other,
}

impl FeeType {
    /// Canonical lowercase name, as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::Tuition => "tuition",
            FeeType::Exam => "exam",
            FeeType::Transport => "transport",
            FeeType::Hostel => "hostel",
            FeeType::Other => "other",
        }
    }
}

/// One immutable owed amount for a student, year, and fee component
///
/// # Example
/// ```
/// use fee_ledger_core_rs::models::{AcademicYear, DueLineItem, FeeType};
///
/// let due = DueLineItem::new(
///     "SCH_01".to_string(),
///     "STU_001".to_string(),
///     AcademicYear::parse("2023-24").unwrap(),
///     FeeType::Tuition,
///     500_000, // Rs 5,000.00 in paise
///     Some("Annual tuition".to_string()),
///     None,
/// );
/// assert_eq!(due.due_amount(), 500_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueLineItem {
    /// Unique line item identifier (UUID)
    id: String,

    /// School the due belongs to
    school_id: String,

    /// Student who owes the amount (foreign to the student directory)
    student_id: String,

    /// Academic year the due applies to
    academic_year: AcademicYear,

    /// Fee component
    fee_type: FeeType,

    /// Owed amount (i64 paise, always positive)
    due_amount: i64,

    /// Free text shown on statements, non-authoritative
    description: Option<String>,

    /// Free text for office use, non-authoritative
    remarks: Option<String>,

    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl DueLineItem {
    /// Create a new due line item
    ///
    /// # Panics
    /// Panics if `due_amount <= 0`. The registrar validates amounts before
    /// construction and reports `InvalidAmount` to callers.
    pub fn new(
        school_id: String,
        student_id: String,
        academic_year: AcademicYear,
        fee_type: FeeType,
        due_amount: i64,
        description: Option<String>,
        remarks: Option<String>,
    ) -> Self {
        assert!(due_amount > 0, "due amount must be positive");

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            student_id,
            academic_year,
            fee_type,
            due_amount,
            description,
            remarks,
            created_at: Utc::now(),
        }
    }

    /// Get line item ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get school ID
    pub fn school_id(&self) -> &str {
        &self.school_id
    }

    /// Get student ID
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Get academic year
    pub fn academic_year(&self) -> &AcademicYear {
        &self.academic_year
    }

    /// Get fee component
    pub fn fee_type(&self) -> FeeType {
        self.fee_type
    }

    /// Get owed amount (i64 paise)
    pub fn due_amount(&self) -> i64 {
        self.due_amount
    }

    /// Get description text
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get remarks text
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    /// Get creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
