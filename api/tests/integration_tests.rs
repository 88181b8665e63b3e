//! Integration tests for the fee ledger API endpoints
//!
//! These drive the full register-due / preview / record-payment / report
//! flows over HTTP.

use axum_test::TestServer;
use serde_json::json;

use fee_ledger_api::{create_router, AppState};
use fee_ledger_core_rs::models::AcademicYear;
use fee_ledger_core_rs::StaticDirectory;

// ============ Test Setup ============

fn test_directory() -> StaticDirectory {
    let mut directory = StaticDirectory::new();
    directory.add_school("SCH_01", AcademicYear::parse("2023-24").unwrap());
    directory.add_student("SCH_01", "STU_001");
    directory.add_student("SCH_01", "STU_002");
    directory
}

fn create_test_server() -> TestServer {
    let state = AppState::new(test_directory(), None).unwrap();
    let router = create_router(state);
    TestServer::new(router).unwrap()
}

async fn register_due(server: &TestServer, student: &str, year: &str, amount: i64) {
    let response = server
        .post("/dues")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": student,
            "academic_year": year,
            "fee_type": "tuition",
            "due_amount": amount,
        }))
        .await;
    response.assert_status_ok();
}

// ============ Health ============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dues_recorded"], 0);
    assert_eq!(body["payments_recorded"], 0);
}

// ============ Due Registration ============

#[tokio::test]
async fn test_register_due_and_read_back() {
    let server = create_test_server();

    let response = server
        .post("/dues")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "academic_year": "2023-24",
            "fee_type": "tuition",
            "due_amount": 500_000,
            "description": "Annual tuition",
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["fee_type"], "tuition");
    assert_eq!(body["due_amount"], 500_000);

    let response = server.get("/schools/SCH_01/students/STU_001/dues").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["summary"]["grand_total_pending"], 500_000);
    assert_eq!(body["year_wise_breakdown"][0]["remaining"], 500_000);
}

#[tokio::test]
async fn test_register_due_validation_errors() {
    let server = create_test_server();

    // Unknown student
    let response = server
        .post("/dues")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_404",
            "academic_year": "2023-24",
            "fee_type": "tuition",
            "due_amount": 500_000,
        }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_STUDENT");

    // Zero amount
    let response = server
        .post("/dues")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "academic_year": "2023-24",
            "fee_type": "tuition",
            "due_amount": 0,
        }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_AMOUNT");

    // Malformed year
    let response = server
        .post("/dues")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "academic_year": "2023/24",
            "fee_type": "tuition",
            "due_amount": 500_000,
        }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_YEAR");

    // Unknown fee type
    let response = server
        .post("/dues")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "academic_year": "2023-24",
            "fee_type": "library",
            "due_amount": 500_000,
        }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_student_dues_unknown_student_is_404() {
    let server = create_test_server();

    let response = server.get("/schools/SCH_01/students/STU_404/dues").await;
    response.assert_status_not_found();
}

// ============ Payment Flow ============

#[tokio::test]
async fn test_lump_payment_settles_oldest_year_first() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2022-23", 500_000).await;
    register_due(&server, "STU_001", "2023-24", 800_000).await;

    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 600_000,
            "payment_mode": "cash",
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["receipt_no"], 1);
    assert_eq!(body["allocations"][0]["academic_year"], "2022-23");
    assert_eq!(body["allocations"][0]["amount"], 500_000);
    assert_eq!(body["allocations"][1]["amount"], 100_000);
    assert_eq!(body["surplus"], 0);

    let response = server.get("/schools/SCH_01/students/STU_001/dues").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["summary"]["total_previous_years_pending"], 0);
    assert_eq!(body["summary"]["current_year_pending"], 700_000);
}

#[tokio::test]
async fn test_preview_then_record_with_version_pin() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2023-24", 500_000).await;

    let response = server
        .post("/payments/preview")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 300_000,
        }))
        .await;
    response.assert_status_ok();
    let preview: serde_json::Value = response.json();
    assert_eq!(preview["allocations"][0]["amount"], 300_000);

    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 300_000,
            "payment_mode": "online",
            "transaction_id": "UPI-001",
            "allocations": preview["allocations"],
            "expected_version": preview["ledger_version"],
        }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_stale_preview_conflicts() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2023-24", 500_000).await;

    let preview: serde_json::Value = server
        .post("/payments/preview")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 500_000,
        }))
        .await
        .json();

    // A competing payment lands first
    server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 500_000,
            "payment_mode": "cash",
        }))
        .await
        .assert_status_ok();

    // Committing the previewed allocation now conflicts
    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 500_000,
            "payment_mode": "cash",
            "allocations": preview["allocations"],
            "expected_version": preview["ledger_version"],
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STALE_ALLOCATION");
}

#[tokio::test]
async fn test_payment_validation_errors() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2023-24", 500_000).await;

    // Non-cash without transaction id
    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 100_000,
            "payment_mode": "cheque",
        }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "TRANSACTION_ID_REQUIRED");

    // Surplus without opt-in
    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 900_000,
            "payment_mode": "cash",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SURPLUS_NOT_ACCEPTED");

    // Student with no dues at all
    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_002",
            "amount": 100_000,
            "payment_mode": "cash",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NO_OUTSTANDING_DUES");
}

#[tokio::test]
async fn test_surplus_accepted_when_opted_in() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2023-24", 500_000).await;

    let response = server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 650_000,
            "payment_mode": "cash",
            "accept_surplus": true,
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["surplus"], 150_000);
}

// ============ Reports ============

#[tokio::test]
async fn test_defaulter_list_with_threshold() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2023-24", 900_000).await;
    register_due(&server, "STU_002", "2023-24", 1_050_000).await;

    let response = server.get("/schools/SCH_01/defaulters?min_amount=1000000").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["student_id"], "STU_002");
    assert_eq!(rows[0]["total_dues"], 1_050_000);

    // Without the filter both show, largest first
    let response = server.get("/schools/SCH_01/defaulters").await;
    let body: serde_json::Value = response.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["student_id"], "STU_002");
}

#[tokio::test]
async fn test_year_summary_percentages() {
    let server = create_test_server();
    register_due(&server, "STU_001", "2022-23", 500_000).await;
    register_due(&server, "STU_002", "2022-23", 500_000).await;

    server
        .post("/payments")
        .json(&json!({
            "school_id": "SCH_01",
            "student_id": "STU_001",
            "amount": 500_000,
            "payment_mode": "cash",
        }))
        .await
        .assert_status_ok();

    let response = server.get("/schools/SCH_01/year-summary").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["academic_year"], "2022-23");
    assert_eq!(rows[0]["collected"], 500_000);
    assert_eq!(rows[0]["pending"], 500_000);
    assert_eq!(rows[0]["students_with_dues"], 1);
    assert_eq!(rows[0]["collection_percentage"], 50.0);
}

#[tokio::test]
async fn test_negative_min_amount_rejected() {
    let server = create_test_server();

    let response = server.get("/schools/SCH_01/defaulters?min_amount=-5").await;
    response.assert_status_bad_request();
}
