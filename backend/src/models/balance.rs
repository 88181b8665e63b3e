//! Derived year balance
//!
//! A `YearBalance` is never stored: it is recomputed on every read by
//! folding the due and payment logs for one student, which keeps the ledger
//! and its summaries from ever drifting apart.
//!
//! CRITICAL: All money values are i64 (paise)

use serde::{Deserialize, Serialize};

use super::year::AcademicYear;

/// Outstanding position of one student in one academic year
///
/// Invariant: `total_paid <= total_due` at all times; the ledger rejects any
/// commit that would break this, so `remaining()` never goes negative.
///
/// # Example
/// ```
/// use fee_ledger_core_rs::models::{AcademicYear, YearBalance};
///
/// let balance = YearBalance::new(
///     AcademicYear::parse("2022-23").unwrap(),
///     500_000,
///     200_000,
/// );
/// assert_eq!(balance.remaining(), 300_000);
/// assert!(!balance.is_settled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBalance {
    academic_year: AcademicYear,
    total_due: i64,
    total_paid: i64,
}

impl YearBalance {
    /// Create a balance from folded totals
    pub fn new(academic_year: AcademicYear, total_due: i64, total_paid: i64) -> Self {
        Self {
            academic_year,
            total_due,
            total_paid,
        }
    }

    /// Get the academic year
    pub fn academic_year(&self) -> &AcademicYear {
        &self.academic_year
    }

    /// Total owed for the year (i64 paise)
    pub fn total_due(&self) -> i64 {
        self.total_due
    }

    /// Total allocated to the year across all payments (i64 paise)
    pub fn total_paid(&self) -> i64 {
        self.total_paid
    }

    /// Amount still outstanding (i64 paise)
    pub fn remaining(&self) -> i64 {
        self.total_due - self.total_paid
    }

    /// A year is settled when nothing remains outstanding
    pub fn is_settled(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(token: &str) -> AcademicYear {
        AcademicYear::parse(token).unwrap()
    }

    #[test]
    fn test_remaining_and_settled() {
        let open = YearBalance::new(year("2023-24"), 800_000, 100_000);
        assert_eq!(open.remaining(), 700_000);
        assert!(!open.is_settled());

        let settled = YearBalance::new(year("2022-23"), 500_000, 500_000);
        assert_eq!(settled.remaining(), 0);
        assert!(settled.is_settled());
    }
}
