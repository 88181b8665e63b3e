//! Payment preview and recording endpoints

use axum::{extract::State, Json};

use fee_ledger_core_rs::models::{AcademicYear, Allocation, PaymentMode};
use fee_ledger_core_rs::recorder::{
    preview_allocation as recorder_preview, record_payment as recorder_record, PaymentRequest,
};

use crate::dto::{
    AllocationDto, PaymentResponse, PreviewRequestDto, PreviewResponse, RecordPaymentRequestDto,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Propose an allocation for an amount against current balances
///
/// Returns the allocation together with the ledger version it was computed
/// at; submit both back via POST /payments to commit exactly this proposal.
pub async fn preview_allocation(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequestDto>,
) -> ApiResult<Json<PreviewResponse>> {
    let ledger = state.ledger_read()?;
    let preview = recorder_preview(&ledger, &req.school_id, &req.student_id, req.amount)?;

    Ok(Json(PreviewResponse {
        allocations: preview.allocations.iter().map(AllocationDto::from).collect(),
        surplus: preview.surplus,
        ledger_version: preview.ledger_version,
    }))
}

/// Record a payment and issue a receipt
pub async fn record_payment(
    State(state): State<AppState>,
    Json(req): Json<RecordPaymentRequestDto>,
) -> ApiResult<Json<PaymentResponse>> {
    let mode = parse_payment_mode(&req.payment_mode)?;
    let allocations = req
        .allocations
        .map(|slices| {
            slices
                .into_iter()
                .map(|dto| {
                    let year = AcademicYear::parse(&dto.academic_year).map_err(|e| {
                        ApiError::Validation(format!("Invalid allocation year: {}", e))
                    })?;
                    Ok(Allocation::new(year, dto.amount))
                })
                .collect::<Result<Vec<_>, ApiError>>()
        })
        .transpose()?;

    let mut ledger = state.ledger_write()?;
    let record = recorder_record(
        &mut ledger,
        PaymentRequest {
            school_id: req.school_id,
            student_id: req.student_id,
            amount: req.amount,
            mode,
            transaction_id: req.transaction_id,
            allocations,
            expected_version: req.expected_version,
            accept_surplus: req.accept_surplus,
        },
    )?;
    state.persist(&ledger);

    tracing::info!(
        receipt_no = record.receipt_no(),
        school_id = record.school_id(),
        student_id = record.student_id(),
        amount = record.payment_amount(),
        "payment recorded"
    );

    Ok(Json(PaymentResponse::from(&record)))
}

pub(crate) fn parse_payment_mode(raw: &str) -> Result<PaymentMode, ApiError> {
    match raw {
        "cash" => Ok(PaymentMode::Cash),
        "online" => Ok(PaymentMode::Online),
        "cheque" => Ok(PaymentMode::Cheque),
        "bank_transfer" => Ok(PaymentMode::BankTransfer),
        _ => Err(ApiError::Validation(format!(
            "Unknown payment mode '{}'; expected cash, online, cheque, or bank_transfer",
            raw
        ))),
    }
}
