//! Domain models for the fee ledger

pub mod balance;
pub mod due;
pub mod payment;
pub mod year;

// Re-exports
pub use balance::YearBalance;
pub use due::{DueLineItem, FeeType};
pub use payment::{Allocation, PaymentMode, PaymentRecord};
pub use year::{AcademicYear, YearError};
