//! Defaulter Aggregator
//!
//! Read-side queries over the append-only logs: per-student defaulter
//! summaries, per-year school summaries, and the year-wise due view for a
//! single student. Every result is computed by folding the logs at call
//! time; there is no cached summary table to drift from the ledger, so
//! calling any query twice with no intervening writes yields identical
//! results.
//!
//! CRITICAL: All money values are i64 (paise)

use serde::{Deserialize, Serialize};

use crate::ledger::{DueLedger, LedgerError};
use crate::models::{AcademicYear, YearBalance};

/// Aggregate outstanding position of one student across all years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaulterSummary {
    pub student_id: String,
    /// Sum of remaining across all years (i64 paise)
    pub total_dues: i64,
    /// Years with remaining > 0, oldest first
    pub years_pending: Vec<AcademicYear>,
    /// Earliest year with remaining > 0
    pub oldest_due: AcademicYear,
}

/// One academic year's collection position across a whole school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub academic_year: AcademicYear,
    /// Gross dues registered for the year (i64 paise)
    pub total_dues: i64,
    /// Total allocated to the year across all payments (i64 paise)
    pub collected: i64,
    /// total_dues - collected (i64 paise)
    pub pending: i64,
    /// Students with remaining > 0 in the year
    pub students_with_dues: usize,
    /// collected / total_dues * 100; 0.0 when nothing is due
    pub collection_percentage: f64,
}

/// Previous-vs-current split of a student's outstanding dues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuesSummary {
    /// Outstanding across years before the school's current year (i64 paise)
    pub total_previous_years_pending: i64,
    /// Outstanding for the current year onward (i64 paise)
    pub current_year_pending: i64,
    /// Sum of the two buckets (i64 paise)
    pub grand_total_pending: i64,
}

/// Year-wise breakdown plus summary for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDuesView {
    pub year_wise_breakdown: Vec<YearBalance>,
    pub summary: DuesSummary,
}

/// List students whose aggregate outstanding exceeds `min_amount`
///
/// Sorted descending by total dues, student id ascending as tie-break so
/// the ordering is fully deterministic.
pub fn list_defaulters(
    ledger: &DueLedger,
    school_id: &str,
    min_amount: i64,
) -> Result<Vec<DefaulterSummary>, LedgerError> {
    let mut defaulters = Vec::new();

    for student_id in ledger.students_in_school(school_id) {
        let balances = ledger.year_balances(school_id, &student_id)?;
        let years_pending: Vec<AcademicYear> = balances
            .iter()
            .filter(|b| b.remaining() > 0)
            .map(|b| b.academic_year().clone())
            .collect();

        let Some(oldest_due) = years_pending.first().cloned() else {
            continue; // fully settled
        };
        let total_dues: i64 = balances.iter().map(YearBalance::remaining).sum();
        if total_dues <= min_amount {
            continue;
        }

        defaulters.push(DefaulterSummary {
            student_id,
            total_dues,
            years_pending,
            oldest_due,
        });
    }

    defaulters.sort_by(|a, b| {
        b.total_dues
            .cmp(&a.total_dues)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });
    Ok(defaulters)
}

/// One row per academic year with dues in the school, ascending by year
pub fn school_year_summary(
    ledger: &DueLedger,
    school_id: &str,
) -> Result<Vec<YearSummary>, LedgerError> {
    use std::collections::BTreeMap;

    struct YearAccumulator {
        total_dues: i64,
        collected: i64,
        students_with_dues: usize,
    }

    let mut by_year: BTreeMap<AcademicYear, YearAccumulator> = BTreeMap::new();

    for student_id in ledger.students_in_school(school_id) {
        for balance in ledger.year_balances(school_id, &student_id)? {
            let entry = by_year
                .entry(balance.academic_year().clone())
                .or_insert(YearAccumulator {
                    total_dues: 0,
                    collected: 0,
                    students_with_dues: 0,
                });
            entry.total_dues += balance.total_due();
            entry.collected += balance.total_paid();
            if balance.remaining() > 0 {
                entry.students_with_dues += 1;
            }
        }
    }

    Ok(by_year
        .into_iter()
        .map(|(academic_year, acc)| {
            let collection_percentage = if acc.total_dues == 0 {
                0.0
            } else {
                acc.collected as f64 / acc.total_dues as f64 * 100.0
            };
            YearSummary {
                academic_year,
                total_dues: acc.total_dues,
                collected: acc.collected,
                pending: acc.total_dues - acc.collected,
                students_with_dues: acc.students_with_dues,
                collection_percentage,
            }
        })
        .collect())
}

/// Year-wise breakdown and previous/current split for one student
///
/// Years strictly before `current_year` are "previous"; the current year
/// and any later pre-registered year count toward the current bucket, so
/// the grand total is always the sum of both.
pub fn student_dues(
    ledger: &DueLedger,
    school_id: &str,
    student_id: &str,
    current_year: &AcademicYear,
) -> Result<StudentDuesView, LedgerError> {
    let balances = ledger.year_balances(school_id, student_id)?;

    let mut previous = 0;
    let mut current = 0;
    for balance in &balances {
        if balance.academic_year() < current_year {
            previous += balance.remaining();
        } else {
            current += balance.remaining();
        }
    }

    Ok(StudentDuesView {
        year_wise_breakdown: balances,
        summary: DuesSummary {
            total_previous_years_pending: previous,
            current_year_pending: current,
            grand_total_pending: previous + current,
        },
    })
}
