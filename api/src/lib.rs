//! Fee Ledger API Server
//!
//! Provides REST APIs over the fee ledger core.
//!
//! ## Endpoints
//!
//! ### Dues
//! - POST /dues - Register a due line item
//! - GET /schools/:school_id/students/:student_id/dues - Year-wise dues for a student
//!
//! ### Payments
//! - POST /payments/preview - Propose an allocation for an amount
//! - POST /payments - Record a payment and issue a receipt
//!
//! ### Reports
//! - GET /schools/:school_id/defaulters - Defaulter list (optional min_amount filter)
//! - GET /schools/:school_id/year-summary - Per-year collection summary
//!
//! ### Health
//! - GET /health - Liveness plus ledger counters

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
