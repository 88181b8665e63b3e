//! API route handlers

pub mod dues;
pub mod health;
pub mod payments;
pub mod reports;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        // Due endpoints
        .route("/dues", post(dues::register_due))
        .route(
            "/schools/:school_id/students/:student_id/dues",
            get(dues::get_student_dues),
        )
        // Payment endpoints
        .route("/payments/preview", post(payments::preview_allocation))
        .route("/payments", post(payments::record_payment))
        // Report endpoints
        .route("/schools/:school_id/defaulters", get(reports::list_defaulters))
        .route(
            "/schools/:school_id/year-summary",
            get(reports::school_year_summary),
        )
        // State
        .with_state(state)
}
