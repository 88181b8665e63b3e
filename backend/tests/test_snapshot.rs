//! Ledger Snapshot Tests
//!
//! Save/load round trips, integrity hashing, and load-time invariant
//! validation.

use fee_ledger_core_rs::ledger::{DueLedger, LedgerSnapshot, SnapshotError};
use fee_ledger_core_rs::models::{AcademicYear, DueLineItem, FeeType, PaymentMode};
use fee_ledger_core_rs::recorder::{record_payment, PaymentRequest};

// ============================================================================
// Test Helpers
// ============================================================================

fn year(token: &str) -> AcademicYear {
    AcademicYear::parse(token).unwrap()
}

fn populated_ledger() -> DueLedger {
    let mut ledger = DueLedger::new();
    for (student, token, amount) in [
        ("STU_001", "2022-23", 500_000),
        ("STU_001", "2023-24", 800_000),
        ("STU_002", "2023-24", 650_000),
    ] {
        ledger.append_due(DueLineItem::new(
            "SCH_01".to_string(),
            student.to_string(),
            year(token),
            FeeType::Tuition,
            amount,
            None,
            None,
        ));
    }
    record_payment(
        &mut ledger,
        PaymentRequest {
            school_id: "SCH_01".to_string(),
            student_id: "STU_001".to_string(),
            amount: 600_000,
            mode: PaymentMode::Cash,
            transaction_id: None,
            allocations: None,
            expected_version: None,
            accept_surplus: false,
        },
    )
    .unwrap();
    ledger
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_capture_restore_preserves_balances() {
    let ledger = populated_ledger();
    let expected = ledger.year_balances("SCH_01", "STU_001").unwrap();

    let snapshot = LedgerSnapshot::capture(&ledger).unwrap();
    let restored = snapshot.restore().unwrap();

    assert_eq!(restored.year_balances("SCH_01", "STU_001").unwrap(), expected);
    assert_eq!(restored.due_count(), ledger.due_count());
    assert_eq!(restored.payment_count(), ledger.payment_count());
}

#[test]
fn test_restore_preserves_receipt_counter_and_versions() {
    let ledger = populated_ledger();
    let snapshot = LedgerSnapshot::capture(&ledger).unwrap();
    let restored = snapshot.restore().unwrap();

    assert_eq!(restored.last_receipt_no("SCH_01"), 1);
    assert_eq!(
        restored.student_version("SCH_01", "STU_001"),
        ledger.student_version("SCH_01", "STU_001")
    );

    // Receipts keep ascending after a restore
    let mut restored = restored;
    let record = record_payment(
        &mut restored,
        PaymentRequest {
            school_id: "SCH_01".to_string(),
            student_id: "STU_002".to_string(),
            amount: 100_000,
            mode: PaymentMode::Cash,
            transaction_id: None,
            allocations: None,
            expected_version: None,
            accept_surplus: false,
        },
    )
    .unwrap();
    assert_eq!(record.receipt_no(), 2);
}

#[test]
fn test_json_round_trip() {
    let ledger = populated_ledger();
    let snapshot = LedgerSnapshot::capture(&ledger).unwrap();

    let json = snapshot.to_json().unwrap();
    let parsed = LedgerSnapshot::from_json(&json).unwrap();
    let restored = parsed.restore().unwrap();

    assert_eq!(restored.payment_count(), 1);
    assert_eq!(
        restored.year_balances("SCH_01", "STU_002").unwrap()[0].remaining(),
        650_000
    );
}

#[test]
fn test_file_round_trip() {
    let ledger = populated_ledger();
    let snapshot = LedgerSnapshot::capture(&ledger).unwrap();

    let dir = std::env::temp_dir().join("fee_ledger_snapshot_test");
    let path = dir.join("ledger.json");
    snapshot.save_to_file(&path).unwrap();

    let loaded = LedgerSnapshot::load_from_file(&path).unwrap();
    let restored = loaded.restore().unwrap();
    assert_eq!(restored.due_count(), 3);

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Integrity Validation
// ============================================================================

#[test]
fn test_tampered_snapshot_rejected() {
    let ledger = populated_ledger();
    let mut snapshot = LedgerSnapshot::capture(&ledger).unwrap();

    // Tamper with a counter after capture
    snapshot.receipt_counters.insert("SCH_01".to_string(), 99);

    let result = snapshot.restore();
    assert!(matches!(
        result,
        Err(SnapshotError::IntegrityHashMismatch { .. })
    ));
}

#[test]
fn test_garbage_json_rejected() {
    assert!(matches!(
        LedgerSnapshot::from_json("{not json"),
        Err(SnapshotError::Serialization(_))
    ));

    // Well-formed JSON with an invalid year token fails validation too
    let json = r#"{
        "dues": [{
            "id": "d1", "school_id": "SCH_01", "student_id": "STU_001",
            "academic_year": "2023-2024", "fee_type": "tuition",
            "due_amount": 100, "description": null, "remarks": null,
            "created_at": "2024-04-01T00:00:00Z"
        }],
        "payments": [], "versions": [], "receipt_counters": {},
        "integrity_hash": ""
    }"#;
    assert!(matches!(
        LedgerSnapshot::from_json(json),
        Err(SnapshotError::Serialization(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = LedgerSnapshot::load_from_file("/nonexistent/fee-ledger.json");
    assert!(matches!(result, Err(SnapshotError::Io(_))));
}
