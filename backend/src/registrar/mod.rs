//! Due Registrar
//!
//! Administrative creation of due line items. The registrar validates the
//! request against the student directory and the canonical year format,
//! then appends exactly one immutable line item. It never touches existing
//! records, so the operation needs no locking and is safe to retry (a retry
//! simply creates another line item).
//!
//! CRITICAL: All money values are i64 (paise)

use thiserror::Error;

use crate::directory::StudentDirectory;
use crate::ledger::DueLedger;
use crate::models::{AcademicYear, DueLineItem, FeeType, YearError};

/// Errors that can occur while registering a due
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrarError {
    #[error("Unknown student '{student_id}' in school '{school_id}'")]
    InvalidStudent {
        school_id: String,
        student_id: String,
    },

    #[error("Invalid academic year: {0}")]
    InvalidYear(#[from] YearError),

    #[error("Due amount must be positive, got {amount}")]
    InvalidAmount { amount: i64 },
}

/// A request to register one due line item
#[derive(Debug, Clone)]
pub struct RegisterDueRequest {
    pub school_id: String,
    pub student_id: String,
    /// Raw year token, validated against the canonical format
    pub academic_year: String,
    pub fee_type: FeeType,
    pub due_amount: i64,
    pub description: Option<String>,
    pub remarks: Option<String>,
}

/// Validate and append a new due line item
///
/// # Errors
/// - `RegistrarError::InvalidStudent` if the student does not resolve in the
///   directory (empty IDs never resolve)
/// - `RegistrarError::InvalidYear` for a malformed year token
/// - `RegistrarError::InvalidAmount` if `due_amount <= 0`
///
/// # Example
/// ```
/// use fee_ledger_core_rs::directory::StaticDirectory;
/// use fee_ledger_core_rs::ledger::DueLedger;
/// use fee_ledger_core_rs::models::{AcademicYear, FeeType};
/// use fee_ledger_core_rs::registrar::{register_due, RegisterDueRequest};
///
/// let mut directory = StaticDirectory::new();
/// directory.add_school("SCH_01", AcademicYear::parse("2023-24").unwrap());
/// directory.add_student("SCH_01", "STU_001");
///
/// let mut ledger = DueLedger::new();
/// let due = register_due(
///     &mut ledger,
///     &directory,
///     RegisterDueRequest {
///         school_id: "SCH_01".to_string(),
///         student_id: "STU_001".to_string(),
///         academic_year: "2023-24".to_string(),
///         fee_type: FeeType::Tuition,
///         due_amount: 500_000,
///         description: None,
///         remarks: None,
///     },
/// )
/// .unwrap();
/// assert_eq!(due.due_amount(), 500_000);
/// ```
pub fn register_due(
    ledger: &mut DueLedger,
    directory: &dyn StudentDirectory,
    request: RegisterDueRequest,
) -> Result<DueLineItem, RegistrarError> {
    if request.school_id.is_empty()
        || request.student_id.is_empty()
        || !directory.student_exists(&request.school_id, &request.student_id)
    {
        return Err(RegistrarError::InvalidStudent {
            school_id: request.school_id,
            student_id: request.student_id,
        });
    }

    let academic_year = AcademicYear::parse(&request.academic_year)?;

    if request.due_amount <= 0 {
        return Err(RegistrarError::InvalidAmount {
            amount: request.due_amount,
        });
    }

    let due = DueLineItem::new(
        request.school_id,
        request.student_id,
        academic_year,
        request.fee_type,
        request.due_amount,
        request.description,
        request.remarks,
    );

    ledger.append_due(due.clone());
    Ok(due)
}
