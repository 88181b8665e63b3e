//! Payment record model
//!
//! Represents one incoming payment and the split of that payment across one
//! or more academic years' outstanding balances. A record is created exactly
//! once by the payment recorder and is immutable afterwards; a mis-posted
//! payment is corrected by a new, explicitly reversing record, never by
//! editing or deleting this one.
//!
//! CRITICAL: All money values are i64 (paise)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::year::AcademicYear;

/// How a payment was made
///
/// Non-cash modes carry an external transaction reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Online,
    Cheque,
    BankTransfer,
}

impl PaymentMode {
    /// Whether this mode requires an external transaction reference
    pub fn requires_transaction_id(&self) -> bool {
        !matches!(self, PaymentMode::Cash)
    }

    /// Canonical lowercase name, as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Online => "online",
            PaymentMode::Cheque => "cheque",
            PaymentMode::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (academic_year, amount) slice of a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    academic_year: AcademicYear,
    amount: i64,
}

impl Allocation {
    /// Create an allocation slice
    pub fn new(academic_year: AcademicYear, amount: i64) -> Self {
        Self {
            academic_year,
            amount,
        }
    }

    /// Get the target academic year
    pub fn academic_year(&self) -> &AcademicYear {
        &self.academic_year
    }

    /// Get the allocated amount (i64 paise)
    pub fn amount(&self) -> i64 {
        self.amount
    }
}

/// Immutable receipt for one committed payment
///
/// Invariant: `Σ allocations.amount + surplus == payment_amount`, and at
/// commit time no allocation targeted a settled year or exceeded that year's
/// remaining balance. The ledger enforces both before anything is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique payment identifier (UUID)
    id: String,

    /// School the payment was made to
    school_id: String,

    /// Student the payment is for
    student_id: String,

    /// Full amount tendered (i64 paise, always positive)
    payment_amount: i64,

    /// How the payment was made
    payment_mode: PaymentMode,

    /// External transaction reference (required for non-cash modes)
    transaction_id: Option<String>,

    /// Split across academic years, oldest year first
    allocations: Vec<Allocation>,

    /// Unallocated remainder accepted as advance credit (i64 paise)
    surplus: i64,

    /// School-scoped monotonically increasing receipt number
    receipt_no: u64,

    /// Commit timestamp
    created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Assemble a committed record. Only the ledger constructs these, after
    /// all invariants have been checked.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        school_id: String,
        student_id: String,
        payment_amount: i64,
        payment_mode: PaymentMode,
        transaction_id: Option<String>,
        allocations: Vec<Allocation>,
        surplus: i64,
        receipt_no: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            student_id,
            payment_amount,
            payment_mode,
            transaction_id,
            allocations,
            surplus,
            receipt_no,
            created_at: Utc::now(),
        }
    }

    /// Get payment ID
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

    /// Get full tendered amount (i64 paise)
    pub fn payment_amount(&self) -> i64 {
        self.payment_amount
    }

    /// Get payment mode
    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    /// Get external transaction reference
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Get the year-wise split, oldest year first
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Get the unallocated remainder (i64 paise)
    pub fn surplus(&self) -> i64 {
        self.surplus
    }

    /// Sum of all allocated amounts (i64 paise)
    pub fn allocated_total(&self) -> i64 {
        self.allocations.iter().map(Allocation::amount).sum()
    }

    /// Get the school-scoped receipt number
    pub fn receipt_no(&self) -> u64 {
        self.receipt_no
    }

    /// Get commit timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Amount allocated to a specific year by this payment (i64 paise)
    pub fn allocated_to(&self, year: &AcademicYear) -> i64 {
        self.allocations
            .iter()
            .filter(|a| a.academic_year() == year)
            .map(Allocation::amount)
            .sum()
    }
}
