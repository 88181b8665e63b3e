//! Due registration and student due view endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use fee_ledger_core_rs::models::FeeType;
use fee_ledger_core_rs::registrar::{register_due as registrar_register_due, RegisterDueRequest};
use fee_ledger_core_rs::{student_dues, SchoolCalendar, StudentDirectory};

use crate::dto::{DueLineItemResponse, RegisterDueRequestDto, StudentDuesResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Register a new due line item
pub async fn register_due(
    State(state): State<AppState>,
    Json(req): Json<RegisterDueRequestDto>,
) -> ApiResult<Json<DueLineItemResponse>> {
    let fee_type = parse_fee_type(&req.fee_type)?;

    let mut ledger = state.ledger_write()?;
    let due = registrar_register_due(
        &mut ledger,
        state.directory.as_ref(),
        RegisterDueRequest {
            school_id: req.school_id,
            student_id: req.student_id,
            academic_year: req.academic_year,
            fee_type,
            due_amount: req.due_amount,
            description: req.description,
            remarks: req.remarks,
        },
    )?;
    state.persist(&ledger);

    Ok(Json(DueLineItemResponse::from(&due)))
}

/// Year-wise dues and previous/current split for one student
pub async fn get_student_dues(
    State(state): State<AppState>,
    Path((school_id, student_id)): Path<(String, String)>,
) -> ApiResult<Json<StudentDuesResponse>> {
    if !state.directory.student_exists(&school_id, &student_id) {
        return Err(ApiError::NotFound(format!(
            "Student {} not found in school {}",
            student_id, school_id
        )));
    }
    let current_year = state
        .directory
        .current_academic_year(&school_id)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "School {} has no configured academic year",
                school_id
            ))
        })?;

    let ledger = state.ledger_read()?;
    let view = student_dues(&ledger, &school_id, &student_id, &current_year)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(StudentDuesResponse::from_view(
        &school_id,
        &student_id,
        &current_year,
        view,
    )))
}

pub(crate) fn parse_fee_type(raw: &str) -> Result<FeeType, ApiError> {
    match raw {
        "tuition" => Ok(FeeType::Tuition),
        "exam" => Ok(FeeType::Exam),
        "transport" => Ok(FeeType::Transport),
        "hostel" => Ok(FeeType::Hostel),
        "other" => Ok(FeeType::Other),
        _ => Err(ApiError::Validation(format!(
            "Unknown fee type '{}'; expected tuition, exam, transport, hostel, or other",
            raw
        ))),
    }
}
