//! Defaulter and collection summary endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use fee_ledger_core_rs::{list_defaulters as aggregate_defaulters, school_year_summary as aggregate_year_summary};

use crate::dto::{DefaulterQueryParams, DefaulterResponse, YearSummaryResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// List students whose outstanding total exceeds min_amount
pub async fn list_defaulters(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
    Query(params): Query<DefaulterQueryParams>,
) -> ApiResult<Json<Vec<DefaulterResponse>>> {
    let min_amount = params.min_amount.unwrap_or(0);
    if min_amount < 0 {
        return Err(ApiError::Validation(
            "min_amount must be non-negative".to_string(),
        ));
    }

    let ledger = state.ledger_read()?;
    let defaulters = aggregate_defaulters(&ledger, &school_id, min_amount)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(defaulters.iter().map(DefaulterResponse::from).collect()))
}

/// Per-year collection summary for a school
pub async fn school_year_summary(
    State(state): State<AppState>,
    Path(school_id): Path<String>,
) -> ApiResult<Json<Vec<YearSummaryResponse>>> {
    let ledger = state.ledger_read()?;
    let summary = aggregate_year_summary(&ledger, &school_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(summary.iter().map(YearSummaryResponse::from).collect()))
}
