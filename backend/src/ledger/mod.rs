//! Due Ledger Store
//!
//! Durable keyed storage of per-student, per-academic-year due records and
//! payment records. Both logs are append-only: line items and payment
//! records are never mutated or deleted once committed, and every derived
//! view (balances, defaulter lists, summaries) is recomputed by folding over
//! the logs on read.
//!
//! # Critical Invariants
//!
//! 1. **Append-only**: committed entries are immutable; corrections are new
//!    entries
//! 2. **No over-allocation**: a commit that would push any year's paid total
//!    past its due total is rejected before anything is applied
//! 3. **All-or-nothing**: `commit_payment` validates the full allocation
//!    first; on any failure no state changes occur
//! 4. **Monotonic receipts**: receipt numbers are per-school counters that
//!    only move forward
//!
//! CRITICAL: All money values are i64 (paise)

pub mod snapshot;

pub use snapshot::{LedgerSnapshot, SnapshotError};

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::events::{EventLog, LedgerEvent};
use crate::models::{
    AcademicYear, Allocation, DueLineItem, PaymentMode, PaymentRecord, YearBalance,
};

/// Errors raised by the ledger's defensive invariant checks.
///
/// These should be unreachable given correct callers; when one triggers the
/// operation fails closed so a financial bug is surfaced instead of masked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error(
        "Allocation of {amount} to year {academic_year} exceeds remaining {remaining} \
         for student {student_id}"
    )]
    OverAllocation {
        student_id: String,
        academic_year: String,
        amount: i64,
        remaining: i64,
    },

    #[error("Allocation amount must be positive, got {amount} for year {academic_year}")]
    NonPositiveAllocation { academic_year: String, amount: i64 },

    #[error(
        "Allocations {allocated} plus surplus {surplus} do not equal payment amount \
         {payment_amount}"
    )]
    UnbalancedRecord {
        payment_amount: i64,
        allocated: i64,
        surplus: i64,
    },

    #[error(
        "Derived balance for year {academic_year} has total_paid {total_paid} exceeding \
         total_due {total_due}"
    )]
    CorruptBalance {
        academic_year: String,
        total_due: i64,
        total_paid: i64,
    },
}

/// A validated payment waiting to be committed.
///
/// Built by the payment recorder after allocation; the ledger re-checks
/// every invariant before applying it.
#[derive(Debug, Clone)]
pub struct PendingPayment {
    pub school_id: String,
    pub student_id: String,
    pub payment_amount: i64,
    pub payment_mode: PaymentMode,
    pub transaction_id: Option<String>,
    pub allocations: Vec<Allocation>,
    pub surplus: i64,
}

/// Append-only due and payment logs, keyed by (school_id, student_id)
#[derive(Debug, Default)]
pub struct DueLedger {
    dues: HashMap<(String, String), Vec<DueLineItem>>,
    payments: HashMap<(String, String), Vec<PaymentRecord>>,
    /// Per-student commit sequence, bumped on every write for that student.
    /// Read together with a balance snapshot, it backs the optimistic
    /// concurrency check in the payment recorder.
    versions: HashMap<(String, String), u64>,
    /// Per-school monotonic receipt counters
    receipt_counters: HashMap<String, u64>,
    events: EventLog,
}

impl DueLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    fn key(school_id: &str, student_id: &str) -> (String, String) {
        (school_id.to_string(), student_id.to_string())
    }

    /// Append a due line item. Pure append; never touches existing records.
    pub fn append_due(&mut self, due: DueLineItem) {
        let key = Self::key(due.school_id(), due.student_id());

        self.events.log(LedgerEvent::DueRegistered {
            school_id: due.school_id().to_string(),
            student_id: due.student_id().to_string(),
            academic_year: due.academic_year().as_str().to_string(),
            fee_type: due.fee_type(),
            due_amount: due.due_amount(),
            due_id: due.id().to_string(),
        });

        *self.versions.entry(key.clone()).or_insert(0) += 1;
        self.dues.entry(key).or_default().push(due);
    }

    /// All due line items for a student, in registration order
    pub fn dues_for(&self, school_id: &str, student_id: &str) -> &[DueLineItem] {
        self.dues
            .get(&Self::key(school_id, student_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All payment records for a student, in commit order
    pub fn payments_for(&self, school_id: &str, student_id: &str) -> &[PaymentRecord] {
        self.payments
            .get(&Self::key(school_id, student_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Current commit sequence for a student (0 if never written)
    pub fn student_version(&self, school_id: &str, student_id: &str) -> u64 {
        self.versions
            .get(&Self::key(school_id, student_id))
            .copied()
            .unwrap_or(0)
    }

    /// Fold the logs into per-year balances, ascending by year
    ///
    /// # Errors
    /// `LedgerError::CorruptBalance` if any year's paid total exceeds its
    /// due total — a state the commit path makes unreachable.
    pub fn year_balances(
        &self,
        school_id: &str,
        student_id: &str,
    ) -> Result<Vec<YearBalance>, LedgerError> {
        let mut due_totals: BTreeMap<AcademicYear, i64> = BTreeMap::new();
        for due in self.dues_for(school_id, student_id) {
            *due_totals.entry(due.academic_year().clone()).or_insert(0) += due.due_amount();
        }

        let mut paid_totals: BTreeMap<AcademicYear, i64> = BTreeMap::new();
        for payment in self.payments_for(school_id, student_id) {
            for allocation in payment.allocations() {
                *paid_totals
                    .entry(allocation.academic_year().clone())
                    .or_insert(0) += allocation.amount();
            }
        }

        let mut balances = Vec::with_capacity(due_totals.len());
        for (year, total_due) in due_totals {
            let total_paid = paid_totals.remove(&year).unwrap_or(0);
            if total_paid > total_due {
                return Err(LedgerError::CorruptBalance {
                    academic_year: year.as_str().to_string(),
                    total_due,
                    total_paid,
                });
            }
            balances.push(YearBalance::new(year, total_due, total_paid));
        }

        // An allocation to a year with no due line item cannot be committed,
        // so anything left in paid_totals is corruption.
        if let Some((year, total_paid)) = paid_totals.into_iter().next() {
            return Err(LedgerError::CorruptBalance {
                academic_year: year.as_str().to_string(),
                total_due: 0,
                total_paid,
            });
        }

        Ok(balances)
    }

    /// Validate and commit a payment, assigning the next receipt number.
    ///
    /// All checks happen before any state changes; on error the ledger is
    /// untouched.
    ///
    /// # Errors
    /// - `LedgerError::UnbalancedRecord` if allocations + surplus do not sum
    ///   to the payment amount
    /// - `LedgerError::NonPositiveAllocation` for a zero or negative slice
    /// - `LedgerError::OverAllocation` if a slice targets a settled year,
    ///   an unknown year, or exceeds a year's remaining balance
    pub fn commit_payment(&mut self, pending: PendingPayment) -> Result<PaymentRecord, LedgerError> {
        let allocated: i64 = pending.allocations.iter().map(Allocation::amount).sum();
        if allocated + pending.surplus != pending.payment_amount {
            return Err(LedgerError::UnbalancedRecord {
                payment_amount: pending.payment_amount,
                allocated,
                surplus: pending.surplus,
            });
        }

        let balances = self.year_balances(&pending.school_id, &pending.student_id)?;
        let mut remaining_by_year: BTreeMap<&AcademicYear, i64> = balances
            .iter()
            .map(|b| (b.academic_year(), b.remaining()))
            .collect();

        for allocation in &pending.allocations {
            if allocation.amount() <= 0 {
                return Err(LedgerError::NonPositiveAllocation {
                    academic_year: allocation.academic_year().as_str().to_string(),
                    amount: allocation.amount(),
                });
            }
            let remaining = remaining_by_year
                .get_mut(allocation.academic_year())
                .ok_or_else(|| LedgerError::OverAllocation {
                    student_id: pending.student_id.clone(),
                    academic_year: allocation.academic_year().as_str().to_string(),
                    amount: allocation.amount(),
                    remaining: 0,
                })?;
            if allocation.amount() > *remaining {
                return Err(LedgerError::OverAllocation {
                    student_id: pending.student_id.clone(),
                    academic_year: allocation.academic_year().as_str().to_string(),
                    amount: allocation.amount(),
                    remaining: *remaining,
                });
            }
            *remaining -= allocation.amount();
        }

        // Validation complete; apply.
        let key = Self::key(&pending.school_id, &pending.student_id);
        let counter = self
            .receipt_counters
            .entry(pending.school_id.clone())
            .or_insert(0);
        *counter += 1;
        let receipt_no = *counter;

        let record = PaymentRecord::new(
            pending.school_id,
            pending.student_id,
            pending.payment_amount,
            pending.payment_mode,
            pending.transaction_id,
            pending.allocations,
            pending.surplus,
            receipt_no,
        );

        self.events.log(LedgerEvent::PaymentRecorded {
            school_id: record.school_id().to_string(),
            student_id: record.student_id().to_string(),
            receipt_no: record.receipt_no(),
            payment_amount: record.payment_amount(),
            allocations: record.allocations().to_vec(),
            surplus: record.surplus(),
        });

        *self.versions.entry(key.clone()).or_insert(0) += 1;
        self.payments.entry(key).or_default().push(record.clone());

        Ok(record)
    }

    /// Students of a school with at least one due line item, sorted
    pub fn students_in_school(&self, school_id: &str) -> Vec<String> {
        let mut students: Vec<String> = self
            .dues
            .keys()
            .filter(|(school, _)| school == school_id)
            .map(|(_, student)| student.clone())
            .collect();
        students.sort();
        students.dedup();
        students
    }

    /// Highest receipt number issued for a school so far (0 if none)
    pub fn last_receipt_no(&self, school_id: &str) -> u64 {
        self.receipt_counters.get(school_id).copied().unwrap_or(0)
    }

    /// Total number of due line items across all students
    pub fn due_count(&self) -> usize {
        self.dues.values().map(Vec::len).sum()
    }

    /// Total number of committed payments across all students
    pub fn payment_count(&self) -> usize {
        self.payments.values().map(Vec::len).sum()
    }

    /// Ledger event log (audit trail and downstream feed)
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Iterate all due line items (snapshot capture)
    pub(crate) fn all_dues(&self) -> impl Iterator<Item = &DueLineItem> {
        self.dues.values().flatten()
    }

    /// Iterate all payment records (snapshot capture)
    pub(crate) fn all_payments(&self) -> impl Iterator<Item = &PaymentRecord> {
        self.payments.values().flatten()
    }

    /// Per-student commit sequences (snapshot capture)
    pub(crate) fn all_versions(&self) -> impl Iterator<Item = (&(String, String), u64)> {
        self.versions.iter().map(|(key, v)| (key, *v))
    }

    /// Per-school receipt counters (snapshot capture)
    pub(crate) fn receipt_counters(&self) -> &HashMap<String, u64> {
        &self.receipt_counters
    }

    /// Rebuild a ledger from snapshot parts. Invariants are re-validated by
    /// the snapshot loader before the ledger is handed out.
    pub(crate) fn from_parts(
        dues: Vec<DueLineItem>,
        payments: Vec<PaymentRecord>,
        versions: HashMap<(String, String), u64>,
        receipt_counters: HashMap<String, u64>,
    ) -> Self {
        let mut ledger = Self {
            versions,
            receipt_counters,
            ..Self::default()
        };
        for due in dues {
            let key = Self::key(due.school_id(), due.student_id());
            ledger.dues.entry(key).or_default().push(due);
        }
        for payment in payments {
            let key = Self::key(payment.school_id(), payment.student_id());
            ledger.payments.entry(key).or_default().push(payment);
        }
        ledger
    }
}
