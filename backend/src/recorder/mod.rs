//! Payment Recorder
//!
//! Applies an allocation to the ledger as one atomic unit and produces an
//! immutable receipt. Two calling modes are supported:
//!
//! - **engine-computed**: the request carries no allocations; the allocation
//!   engine computes one against the ledger's current balances
//! - **explicit**: the request carries allocations from a prior preview;
//!   they are re-validated against the current balances and rejected as
//!   stale if the ledger moved in between
//!
//! The caller must hold exclusive access to the ledger for the duration of
//! the call (the API server wraps the ledger in a write lock), which makes
//! the read-allocate-commit sequence atomic per student. The per-student
//! version check covers the preview-to-record window that spans two calls.
//!
//! CRITICAL: All money values are i64 (paise)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::collections::BTreeMap;

use crate::allocation::{allocate, AllocationError, AllocationOutcome};
use crate::ledger::{DueLedger, LedgerError, PendingPayment};
use crate::models::{AcademicYear, Allocation, PaymentMode, PaymentRecord, YearBalance};

/// Errors that can occur while recording a payment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("Payment amount must be positive, got {amount}")]
    InvalidPaymentAmount { amount: i64 },

    #[error("Transaction id is required for {mode} payments")]
    TransactionIdRequired { mode: PaymentMode },

    #[error("No outstanding dues to allocate for student '{student_id}'")]
    NoOutstandingDues { student_id: String },

    #[error("Allocation is stale: the ledger changed since it was computed")]
    StaleAllocation,

    #[error("Invalid explicit allocation: {reason}")]
    InvalidAllocation { reason: String },

    #[error("Payment exceeds outstanding dues by {surplus}; surplus was not accepted")]
    SurplusNotAccepted { surplus: i64 },

    #[error("Ledger invariant violation: {0}")]
    InvariantViolation(#[from] LedgerError),
}

impl From<AllocationError> for RecorderError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidPaymentAmount { amount } => {
                RecorderError::InvalidPaymentAmount { amount }
            }
        }
    }
}

/// A request to record one payment
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub school_id: String,
    pub student_id: String,
    /// Full amount tendered (i64 paise)
    pub amount: i64,
    pub mode: PaymentMode,
    pub transaction_id: Option<String>,
    /// Explicit allocation from a prior preview; `None` lets the engine
    /// compute one against the current balances
    pub allocations: Option<Vec<Allocation>>,
    /// Ledger version the explicit allocation was computed at; a mismatch
    /// is rejected as stale before any validation work
    pub expected_version: Option<u64>,
    /// Whether an unallocatable remainder may be committed as advance
    /// credit; without this a surplus rejects the payment
    pub accept_surplus: bool,
}

/// Proposed allocation for a payment, bound to a ledger version
///
/// Submit it back via `PaymentRequest { allocations, expected_version, .. }`
/// to commit exactly what was previewed, or let the recorder recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPreview {
    pub allocations: Vec<Allocation>,
    pub surplus: i64,
    pub ledger_version: u64,
}

/// Compute a proposed allocation without committing anything
///
/// # Errors
/// - `RecorderError::InvalidPaymentAmount` if `amount <= 0`
/// - `RecorderError::InvariantViolation` if the ledger folds to a corrupt
///   balance
pub fn preview_allocation(
    ledger: &DueLedger,
    school_id: &str,
    student_id: &str,
    amount: i64,
) -> Result<AllocationPreview, RecorderError> {
    let balances = ledger.year_balances(school_id, student_id)?;
    let outcome = allocate(&balances, amount)?;

    Ok(AllocationPreview {
        surplus: outcome.surplus(),
        allocations: outcome.into_allocations(),
        ledger_version: ledger.student_version(school_id, student_id),
    })
}

/// Validate, allocate, and atomically commit a payment
///
/// Validation order: amount, transaction id, version, allocation. Nothing is
/// applied until every check passes; the commit itself re-checks the
/// allocation against the ledger and fails closed on any discrepancy.
///
/// # Errors
/// - `RecorderError::InvalidPaymentAmount` if `amount <= 0`
/// - `RecorderError::TransactionIdRequired` for a non-cash mode without a
///   transaction reference
/// - `RecorderError::StaleAllocation` if `expected_version` no longer
///   matches, or an explicit allocation no longer fits the current balances
/// - `RecorderError::InvalidAllocation` for a structurally bad explicit
///   allocation (non-positive slice, slices exceeding the payment amount)
/// - `RecorderError::NoOutstandingDues` when nothing can be allocated and
///   surplus was not accepted
/// - `RecorderError::SurplusNotAccepted` when a partial surplus remains and
///   surplus was not accepted
pub fn record_payment(
    ledger: &mut DueLedger,
    request: PaymentRequest,
) -> Result<PaymentRecord, RecorderError> {
    if request.amount <= 0 {
        return Err(RecorderError::InvalidPaymentAmount {
            amount: request.amount,
        });
    }

    let has_transaction_id = request
        .transaction_id
        .as_deref()
        .map(|id| !id.is_empty())
        .unwrap_or(false);
    if request.mode.requires_transaction_id() && !has_transaction_id {
        return Err(RecorderError::TransactionIdRequired { mode: request.mode });
    }

    if let Some(expected) = request.expected_version {
        let current = ledger.student_version(&request.school_id, &request.student_id);
        if expected != current {
            return Err(RecorderError::StaleAllocation);
        }
    }

    let balances = ledger.year_balances(&request.school_id, &request.student_id)?;

    let outcome = match &request.allocations {
        None => allocate(&balances, request.amount)?,
        Some(explicit) => validate_explicit(explicit, &balances, request.amount)?,
    };

    if outcome.is_empty() && !request.accept_surplus {
        return Err(RecorderError::NoOutstandingDues {
            student_id: request.student_id,
        });
    }
    if outcome.surplus() > 0 && !request.accept_surplus {
        return Err(RecorderError::SurplusNotAccepted {
            surplus: outcome.surplus(),
        });
    }

    let surplus = outcome.surplus();
    let record = ledger.commit_payment(PendingPayment {
        school_id: request.school_id,
        student_id: request.student_id,
        payment_amount: request.amount,
        payment_mode: request.mode,
        transaction_id: request.transaction_id,
        allocations: outcome.into_allocations(),
        surplus,
    })?;

    Ok(record)
}

/// Re-validate a client-supplied allocation against current balances
///
/// Structural problems (bad slice amounts, totals exceeding the payment)
/// are `InvalidAllocation`; disagreements with the current ledger state
/// (settled or unknown year, slice above remaining) are `StaleAllocation`,
/// since a well-formed preview can only disagree if the ledger moved.
fn validate_explicit(
    explicit: &[Allocation],
    balances: &[YearBalance],
    payment_amount: i64,
) -> Result<AllocationOutcome, RecorderError> {
    let mut allocated: i64 = 0;
    for slice in explicit {
        if slice.amount() <= 0 {
            return Err(RecorderError::InvalidAllocation {
                reason: format!(
                    "allocation to {} must be positive, got {}",
                    slice.academic_year(),
                    slice.amount()
                ),
            });
        }
        allocated += slice.amount();
    }
    if allocated > payment_amount {
        return Err(RecorderError::InvalidAllocation {
            reason: format!(
                "allocations total {} exceeds payment amount {}",
                allocated, payment_amount
            ),
        });
    }

    let mut remaining_by_year: BTreeMap<&AcademicYear, i64> = balances
        .iter()
        .map(|b| (b.academic_year(), b.remaining()))
        .collect();

    for slice in explicit {
        match remaining_by_year.get_mut(slice.academic_year()) {
            None => return Err(RecorderError::StaleAllocation),
            Some(remaining) => {
                if *remaining == 0 || slice.amount() > *remaining {
                    return Err(RecorderError::StaleAllocation);
                }
                *remaining -= slice.amount();
            }
        }
    }

    // Re-express as an engine outcome so the commit path is identical
    let outcome = AllocationOutcome::from_validated(explicit.to_vec(), payment_amount - allocated);
    Ok(outcome)
}
