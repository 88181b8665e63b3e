//! Data Transfer Objects for API requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fee_ledger_core_rs::{
    AcademicYear, Allocation, DefaulterSummary, DueLineItem, PaymentRecord, StudentDuesView,
    YearSummary,
};

// ============ Due DTOs ============

/// Register due request
#[derive(Debug, Deserialize)]
pub struct RegisterDueRequestDto {
    pub school_id: String,
    pub student_id: String,
    /// Canonical year token (e.g. "2023-24")
    pub academic_year: String,
    /// One of: tuition, exam, transport, hostel, other
    pub fee_type: String,
    /// Owed amount in paise
    pub due_amount: i64,
    pub description: Option<String>,
    pub remarks: Option<String>,
}

/// Due line item response
#[derive(Debug, Serialize)]
pub struct DueLineItemResponse {
    pub id: String,
    pub school_id: String,
    pub student_id: String,
    pub academic_year: String,
    pub fee_type: String,
    pub due_amount: i64,
    pub description: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&DueLineItem> for DueLineItemResponse {
    fn from(due: &DueLineItem) -> Self {
        Self {
            id: due.id().to_string(),
            school_id: due.school_id().to_string(),
            student_id: due.student_id().to_string(),
            academic_year: due.academic_year().as_str().to_string(),
            fee_type: due.fee_type().as_str().to_string(),
            due_amount: due.due_amount(),
            description: due.description().map(str::to_string),
            remarks: due.remarks().map(str::to_string),
            created_at: due.created_at(),
        }
    }
}

// ============ Student Due View DTOs ============

/// One year's balance row
#[derive(Debug, Serialize)]
pub struct YearBalanceDto {
    pub academic_year: String,
    pub total_due: i64,
    pub total_paid: i64,
    pub remaining: i64,
    pub settled: bool,
}

/// Previous/current split summary
#[derive(Debug, Serialize)]
pub struct DuesSummaryDto {
    pub total_previous_years_pending: i64,
    pub current_year_pending: i64,
    pub grand_total_pending: i64,
}

/// Student dues response
#[derive(Debug, Serialize)]
pub struct StudentDuesResponse {
    pub school_id: String,
    pub student_id: String,
    pub current_academic_year: String,
    pub year_wise_breakdown: Vec<YearBalanceDto>,
    pub summary: DuesSummaryDto,
}

impl StudentDuesResponse {
    pub fn from_view(
        school_id: &str,
        student_id: &str,
        current_year: &AcademicYear,
        view: StudentDuesView,
    ) -> Self {
        Self {
            school_id: school_id.to_string(),
            student_id: student_id.to_string(),
            current_academic_year: current_year.as_str().to_string(),
            year_wise_breakdown: view
                .year_wise_breakdown
                .iter()
                .map(|b| YearBalanceDto {
                    academic_year: b.academic_year().as_str().to_string(),
                    total_due: b.total_due(),
                    total_paid: b.total_paid(),
                    remaining: b.remaining(),
                    settled: b.is_settled(),
                })
                .collect(),
            summary: DuesSummaryDto {
                total_previous_years_pending: view.summary.total_previous_years_pending,
                current_year_pending: view.summary.current_year_pending,
                grand_total_pending: view.summary.grand_total_pending,
            },
        }
    }
}

// ============ Payment DTOs ============

/// One (year, amount) slice on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationDto {
    pub academic_year: String,
    pub amount: i64,
}

impl From<&Allocation> for AllocationDto {
    fn from(allocation: &Allocation) -> Self {
        Self {
            academic_year: allocation.academic_year().as_str().to_string(),
            amount: allocation.amount(),
        }
    }
}

/// Preview allocation request
#[derive(Debug, Deserialize)]
pub struct PreviewRequestDto {
    pub school_id: String,
    pub student_id: String,
    /// Amount to allocate, in paise
    pub amount: i64,
}

/// Preview allocation response
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub allocations: Vec<AllocationDto>,
    pub surplus: i64,
    /// Pass back with the payment to detect concurrent changes
    pub ledger_version: u64,
}

/// Record payment request
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequestDto {
    pub school_id: String,
    pub student_id: String,
    /// Amount tendered, in paise
    pub amount: i64,
    /// One of: cash, online, cheque, bank_transfer
    pub payment_mode: String,
    pub transaction_id: Option<String>,
    /// Explicit allocation from a prior preview; omit to allocate
    /// automatically (oldest year first)
    pub allocations: Option<Vec<AllocationDto>>,
    /// Ledger version the preview was computed at
    pub expected_version: Option<u64>,
    /// Accept an unallocatable remainder as advance credit
    #[serde(default)]
    pub accept_surplus: bool,
}

/// Payment receipt response
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub receipt_no: u64,
    pub school_id: String,
    pub student_id: String,
    pub payment_amount: i64,
    pub payment_mode: String,
    pub transaction_id: Option<String>,
    pub allocations: Vec<AllocationDto>,
    pub surplus: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&PaymentRecord> for PaymentResponse {
    fn from(record: &PaymentRecord) -> Self {
        Self {
            id: record.id().to_string(),
            receipt_no: record.receipt_no(),
            school_id: record.school_id().to_string(),
            student_id: record.student_id().to_string(),
            payment_amount: record.payment_amount(),
            payment_mode: record.payment_mode().as_str().to_string(),
            transaction_id: record.transaction_id().map(str::to_string),
            allocations: record.allocations().iter().map(AllocationDto::from).collect(),
            surplus: record.surplus(),
            created_at: record.created_at(),
        }
    }
}

// ============ Report DTOs ============

/// Defaulter list query parameters
#[derive(Debug, Deserialize)]
pub struct DefaulterQueryParams {
    /// Exclusive lower bound on total outstanding, in paise
    pub min_amount: Option<i64>,
}

/// Defaulter row
#[derive(Debug, Serialize)]
pub struct DefaulterResponse {
    pub student_id: String,
    pub total_dues: i64,
    pub years_pending: Vec<String>,
    pub oldest_due: String,
}

impl From<&DefaulterSummary> for DefaulterResponse {
    fn from(summary: &DefaulterSummary) -> Self {
        Self {
            student_id: summary.student_id.clone(),
            total_dues: summary.total_dues,
            years_pending: summary
                .years_pending
                .iter()
                .map(|y| y.as_str().to_string())
                .collect(),
            oldest_due: summary.oldest_due.as_str().to_string(),
        }
    }
}

/// Year summary row
#[derive(Debug, Serialize)]
pub struct YearSummaryResponse {
    pub academic_year: String,
    pub total_dues: i64,
    pub collected: i64,
    pub pending: i64,
    pub students_with_dues: usize,
    pub collection_percentage: f64,
}

impl From<&YearSummary> for YearSummaryResponse {
    fn from(summary: &YearSummary) -> Self {
        Self {
            academic_year: summary.academic_year.as_str().to_string(),
            total_dues: summary.total_dues,
            collected: summary.collected,
            pending: summary.pending,
            students_with_dues: summary.students_with_dues,
            collection_percentage: summary.collection_percentage,
        }
    }
}

// ============ Health DTOs ============

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dues_recorded: usize,
    pub payments_recorded: usize,
}
