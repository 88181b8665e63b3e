//! Fee Ledger Core - Rust Engine
//!
//! Multi-year fee dues and payment allocation engine with an append-only
//! ledger and deterministic allocation.
//!
//! # Architecture
//!
//! - **models**: Domain types (AcademicYear, DueLineItem, PaymentRecord, YearBalance)
//! - **ledger**: Append-only due/payment store keyed by (school, student), plus snapshots
//! - **allocation**: Oldest-year-first allocation engine (pure functions)
//! - **registrar**: Due registration (validated append)
//! - **recorder**: Atomic payment recording with optimistic concurrency
//! - **aggregator**: Defaulter lists, year summaries, student due views
//! - **events**: Ledger event log for auditing and downstream consumers
//! - **directory**: External collaborator traits (student directory, school calendar)
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (paise)
//! 2. Due and payment logs are append-only; derived views are recomputed on read
//! 3. No year is ever paid past its due total; violations fail closed
//! 4. Allocation is deterministic: oldest year first, greedy, exact

// Module declarations
pub mod aggregator;
pub mod allocation;
pub mod directory;
pub mod events;
pub mod ledger;
pub mod models;
pub mod recorder;
pub mod registrar;

// Re-exports for convenience
pub use aggregator::{
    list_defaulters, school_year_summary, student_dues, DefaulterSummary, DuesSummary,
    StudentDuesView, YearSummary,
};
pub use allocation::{allocate, AllocationError, AllocationOutcome};
pub use directory::{SchoolCalendar, StaticDirectory, StudentDirectory};
pub use events::{EventLog, LedgerEvent};
pub use ledger::{DueLedger, LedgerError, LedgerSnapshot, PendingPayment, SnapshotError};
pub use models::{
    AcademicYear, Allocation, DueLineItem, FeeType, PaymentMode, PaymentRecord, YearBalance,
    YearError,
};
pub use recorder::{
    preview_allocation, record_payment, AllocationPreview, PaymentRequest, RecorderError,
};
pub use registrar::{register_due, RegisterDueRequest, RegistrarError};
