//! Allocation Engine
//!
//! Pure computation of how an incoming payment retires a student's
//! outstanding year balances. The policy is oldest-year-first, greedy, and
//! exact: sort the balances ascending by academic year, walk the sorted
//! list, and give each year `min(remaining, amount_left)` until the payment
//! or the list is exhausted.
//!
//! # Critical Invariants
//!
//! 1. **Determinism**: identical balances and amount always produce the
//!    identical allocation (total ordering of years, no randomness)
//! 2. **Exactness**: `Σ allocated == min(payment_amount, Σ remaining)`
//! 3. **No over-allocation**: no slice ever exceeds its year's remaining;
//!    any excess is reported as surplus, never misapplied
//!
//! CRITICAL: All money values are i64 (paise)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Allocation, YearBalance};

/// Errors that can occur while computing an allocation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Payment amount must be positive, got {amount}")]
    InvalidPaymentAmount { amount: i64 },
}

/// Result of allocating one payment against a set of year balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    allocations: Vec<Allocation>,
    surplus: i64,
}

impl AllocationOutcome {
    /// Wrap an already-validated allocation (explicit-allocation path in the
    /// payment recorder) so both calling modes share one commit path
    pub(crate) fn from_validated(allocations: Vec<Allocation>, surplus: i64) -> Self {
        Self {
            allocations,
            surplus,
        }
    }

    /// Year-wise slices, oldest year first
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Consume the outcome, yielding the slices
    pub fn into_allocations(self) -> Vec<Allocation> {
        self.allocations
    }

    /// Portion of the payment exceeding total outstanding dues (i64 paise)
    pub fn surplus(&self) -> i64 {
        self.surplus
    }

    /// Sum of all allocated slices (i64 paise)
    pub fn allocated_total(&self) -> i64 {
        self.allocations.iter().map(Allocation::amount).sum()
    }

    /// True when nothing could be allocated (no outstanding dues)
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

/// Allocate a payment across outstanding year balances, oldest year first
///
/// Settled years (remaining == 0) are skipped. If the payment exceeds the
/// total outstanding amount, the excess is returned as surplus for the
/// caller to handle; it is never forced onto a year.
///
/// # Errors
/// - `AllocationError::InvalidPaymentAmount` if `payment_amount <= 0`
///
/// # Example
/// ```
/// use fee_ledger_core_rs::allocation::allocate;
/// use fee_ledger_core_rs::models::{AcademicYear, YearBalance};
///
/// let balances = vec![
///     YearBalance::new(AcademicYear::parse("2023-24").unwrap(), 800_000, 0),
///     YearBalance::new(AcademicYear::parse("2022-23").unwrap(), 500_000, 0),
/// ];
///
/// // Rs 6,000 retires 2022-23 fully and puts Rs 1,000 toward 2023-24
/// let outcome = allocate(&balances, 600_000).unwrap();
/// assert_eq!(outcome.allocations().len(), 2);
/// assert_eq!(outcome.allocations()[0].amount(), 500_000);
/// assert_eq!(outcome.allocations()[1].amount(), 100_000);
/// assert_eq!(outcome.surplus(), 0);
/// ```
pub fn allocate(
    balances: &[YearBalance],
    payment_amount: i64,
) -> Result<AllocationOutcome, AllocationError> {
    if payment_amount <= 0 {
        return Err(AllocationError::InvalidPaymentAmount {
            amount: payment_amount,
        });
    }

    let mut open: Vec<&YearBalance> = balances.iter().filter(|b| b.remaining() > 0).collect();
    open.sort_by(|a, b| a.academic_year().cmp(b.academic_year()));

    let mut allocations = Vec::new();
    let mut amount_left = payment_amount;

    for balance in open {
        if amount_left == 0 {
            break;
        }
        let slice = balance.remaining().min(amount_left);
        allocations.push(Allocation::new(balance.academic_year().clone(), slice));
        amount_left -= slice;
    }

    Ok(AllocationOutcome {
        allocations,
        surplus: amount_left,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AcademicYear;

    fn balance(token: &str, due: i64, paid: i64) -> YearBalance {
        YearBalance::new(AcademicYear::parse(token).unwrap(), due, paid)
    }

    #[test]
    fn test_oldest_year_first() {
        let balances = vec![
            balance("2023-24", 800_000, 0),
            balance("2021-22", 300_000, 0),
            balance("2022-23", 500_000, 0),
        ];

        // Less than the oldest year's remaining touches only that year
        let outcome = allocate(&balances, 200_000).unwrap();
        assert_eq!(outcome.allocations().len(), 1);
        assert_eq!(outcome.allocations()[0].academic_year().as_str(), "2021-22");
        assert_eq!(outcome.allocations()[0].amount(), 200_000);
        assert_eq!(outcome.surplus(), 0);
    }

    #[test]
    fn test_spills_into_next_year_exactly() {
        let balances = vec![balance("2022-23", 500_000, 0), balance("2023-24", 800_000, 0)];

        let outcome = allocate(&balances, 600_000).unwrap();
        assert_eq!(outcome.allocated_total(), 600_000);
        assert_eq!(outcome.allocations()[0].amount(), 500_000);
        assert_eq!(outcome.allocations()[1].amount(), 100_000);
    }

    #[test]
    fn test_skips_settled_years() {
        let balances = vec![
            balance("2021-22", 300_000, 300_000), // settled
            balance("2022-23", 500_000, 400_000),
        ];

        let outcome = allocate(&balances, 50_000).unwrap();
        assert_eq!(outcome.allocations().len(), 1);
        assert_eq!(outcome.allocations()[0].academic_year().as_str(), "2022-23");
    }

    #[test]
    fn test_surplus_reported_not_misapplied() {
        let balances = vec![balance("2022-23", 500_000, 450_000)];

        let outcome = allocate(&balances, 100_000).unwrap();
        assert_eq!(outcome.allocated_total(), 50_000);
        assert_eq!(outcome.surplus(), 50_000);
    }

    #[test]
    fn test_no_dues_full_surplus() {
        let outcome = allocate(&[], 250_000).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.surplus(), 250_000);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let balances = vec![balance("2022-23", 500_000, 0)];

        assert_eq!(
            allocate(&balances, 0),
            Err(AllocationError::InvalidPaymentAmount { amount: 0 })
        );
        assert_eq!(
            allocate(&balances, -100),
            Err(AllocationError::InvalidPaymentAmount { amount: -100 })
        );
    }

    #[test]
    fn test_deterministic_regardless_of_input_order() {
        let a = vec![
            balance("2023-24", 800_000, 0),
            balance("2021-22", 300_000, 100_000),
            balance("2022-23", 500_000, 0),
        ];
        let mut b = a.clone();
        b.reverse();

        let out_a = allocate(&a, 650_000).unwrap();
        let out_b = allocate(&b, 650_000).unwrap();
        assert_eq!(out_a, out_b);
    }
}
