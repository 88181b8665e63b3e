//! Ledger snapshot - save/load durable state
//!
//! Serializes the complete ledger (both append-only logs, per-student commit
//! sequences, per-school receipt counters) for persistence and restart.
//!
//! # Critical Invariants
//!
//! - **Integrity**: a SHA256 hash of the serialized logs is embedded in the
//!   snapshot; load fails closed on mismatch
//! - **No negative balances**: every (student, year) position is re-folded
//!   and validated before a restored ledger is handed out
//! - **Receipt monotonicity**: restored counters must be at least the
//!   highest receipt number present in the payment log

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::{DueLedger, LedgerError};
use crate::models::{DueLineItem, PaymentRecord};

/// Errors that can occur while saving or restoring a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Integrity hash mismatch: snapshot carries {expected}, computed {computed}")]
    IntegrityHashMismatch { expected: String, computed: String },

    #[error("Corrupt ledger state: {0}")]
    CorruptLedger(#[from] LedgerError),

    #[error(
        "Receipt counter for school {school_id} is {counter} but the payment log \
         contains receipt {max_receipt_no}"
    )]
    ReceiptCounterBehind {
        school_id: String,
        counter: u64,
        max_receipt_no: u64,
    },
}

/// Per-student commit sequence entry
///
/// Tuple-keyed maps do not survive JSON, so sequences are flattened into
/// rows for the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentVersion {
    pub school_id: String,
    pub student_id: String,
    pub version: u64,
}

/// Complete ledger snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// All due line items, ordered by (school, student, id) for stable output
    pub dues: Vec<DueLineItem>,

    /// All payment records, ordered by (school, student, receipt_no)
    pub payments: Vec<PaymentRecord>,

    /// Per-student commit sequences
    pub versions: Vec<StudentVersion>,

    /// Per-school receipt counters
    pub receipt_counters: HashMap<String, u64>,

    /// SHA256 hash of the serialized logs (for integrity validation)
    pub integrity_hash: String,
}

impl LedgerSnapshot {
    /// Capture the current ledger state
    pub fn capture(ledger: &DueLedger) -> Result<Self, SnapshotError> {
        let mut dues: Vec<DueLineItem> = ledger.all_dues().cloned().collect();
        dues.sort_by(|a, b| {
            (a.school_id(), a.student_id(), a.id()).cmp(&(b.school_id(), b.student_id(), b.id()))
        });

        let mut payments: Vec<PaymentRecord> = ledger.all_payments().cloned().collect();
        payments.sort_by(|a, b| {
            (a.school_id(), a.student_id(), a.receipt_no()).cmp(&(
                b.school_id(),
                b.student_id(),
                b.receipt_no(),
            ))
        });

        let mut versions: Vec<StudentVersion> = ledger
            .all_versions()
            .map(|((school_id, student_id), version)| StudentVersion {
                school_id: school_id.clone(),
                student_id: student_id.clone(),
                version,
            })
            .collect();
        versions.sort_by(|a, b| {
            (&a.school_id, &a.student_id).cmp(&(&b.school_id, &b.student_id))
        });

        let receipt_counters = ledger.receipt_counters().clone();
        let integrity_hash = compute_integrity_hash(&dues, &payments, &receipt_counters)?;

        Ok(Self {
            dues,
            payments,
            versions,
            receipt_counters,
            integrity_hash,
        })
    }

    /// Rebuild a ledger, verifying integrity and every balance invariant
    pub fn restore(self) -> Result<DueLedger, SnapshotError> {
        let computed = compute_integrity_hash(&self.dues, &self.payments, &self.receipt_counters)?;
        if computed != self.integrity_hash {
            return Err(SnapshotError::IntegrityHashMismatch {
                expected: self.integrity_hash,
                computed,
            });
        }

        // Receipt counters must cover every receipt already issued
        let mut max_receipts: HashMap<String, u64> = HashMap::new();
        for payment in &self.payments {
            let entry = max_receipts
                .entry(payment.school_id().to_string())
                .or_insert(0);
            *entry = (*entry).max(payment.receipt_no());
        }
        for (school_id, max_receipt_no) in &max_receipts {
            let counter = self.receipt_counters.get(school_id).copied().unwrap_or(0);
            if counter < *max_receipt_no {
                return Err(SnapshotError::ReceiptCounterBehind {
                    school_id: school_id.clone(),
                    counter,
                    max_receipt_no: *max_receipt_no,
                });
            }
        }

        let versions: HashMap<(String, String), u64> = self
            .versions
            .into_iter()
            .map(|v| ((v.school_id, v.student_id), v.version))
            .collect();

        let ledger = DueLedger::from_parts(
            self.dues,
            self.payments,
            versions,
            self.receipt_counters,
        );

        // Re-fold every student; any over-paid year fails the load
        let mut keys: Vec<(String, String)> = ledger
            .all_dues()
            .map(|d| (d.school_id().to_string(), d.student_id().to_string()))
            .chain(
                ledger
                    .all_payments()
                    .map(|p| (p.school_id().to_string(), p.student_id().to_string())),
            )
            .collect();
        keys.sort();
        keys.dedup();
        for (school_id, student_id) in keys {
            ledger.year_balances(&school_id, &student_id)?;
        }

        Ok(ledger)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the snapshot to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a snapshot from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Compute a deterministic SHA256 hash over the serialized logs
///
/// The inputs are pre-sorted vectors plus a BTreeMap view of the counters,
/// so the serialization (and the hash) is stable regardless of HashMap
/// iteration order.
fn compute_integrity_hash(
    dues: &[DueLineItem],
    payments: &[PaymentRecord],
    receipt_counters: &HashMap<String, u64>,
) -> Result<String, serde_json::Error> {
    let sorted_counters: std::collections::BTreeMap<&String, u64> = receipt_counters
        .iter()
        .map(|(school, counter)| (school, *counter))
        .collect();

    let json = serde_json::to_string(&(dues, payments, &sorted_counters))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(format!("{:x}", result))
}
