//! Ledger event logging for auditing and downstream consumers.
//!
//! Every committed write to the due ledger produces an event. Events enable:
//! - Auditing (verify how a student's position was reached)
//! - Downstream notification (receipt/SMS modules subscribe to
//!   `PaymentRecorded`; delivery semantics are the subscriber's concern)
//! - Debugging (understand what happened and in which order)
//!
//! The log is append-only and is not part of the authoritative ledger state:
//! balances are always folded from the due and payment logs, never from
//! events.

use crate::models::{Allocation, FeeType};

/// Ledger event capturing one committed write.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    /// A new due line item was appended
    DueRegistered {
        school_id: String,
        student_id: String,
        academic_year: String,
        fee_type: FeeType,
        due_amount: i64,
        due_id: String,
    },

    /// A payment was committed and a receipt issued
    PaymentRecorded {
        school_id: String,
        student_id: String,
        receipt_no: u64,
        payment_amount: i64,
        allocations: Vec<Allocation>,
        surplus: i64,
    },
}

impl LedgerEvent {
    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::DueRegistered { .. } => "DueRegistered",
            LedgerEvent::PaymentRecorded { .. } => "PaymentRecorded",
        }
    }

    /// Get the school the event belongs to
    pub fn school_id(&self) -> &str {
        match self {
            LedgerEvent::DueRegistered { school_id, .. } => school_id,
            LedgerEvent::PaymentRecorded { school_id, .. } => school_id,
        }
    }

    /// Get the student the event relates to
    pub fn student_id(&self) -> &str {
        match self {
            LedgerEvent::DueRegistered { student_id, .. } => student_id,
            LedgerEvent::PaymentRecorded { student_id, .. } => student_id,
        }
    }
}

/// Event log for storing and querying ledger events.
///
/// This is a simple wrapper around Vec<LedgerEvent> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific school
    pub fn events_for_school(&self, school_id: &str) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.school_id() == school_id)
            .collect()
    }

    /// Get events for a specific student
    pub fn events_for_student(&self, school_id: &str, student_id: &str) -> Vec<&LedgerEvent> {
        self.events
            .iter()
            .filter(|e| e.school_id() == school_id && e.student_id() == student_id)
            .collect()
    }
}
