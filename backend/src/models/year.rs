//! Academic year token
//!
//! Canonical format is `"YYYY-YY"` (e.g. `"2023-24"`): a four-digit start
//! year, a dash, and the two-digit suffix of the following year. Because the
//! start year is zero-padded to four digits, lexical ordering of valid tokens
//! equals chronological ordering, so the allocation engine can sort balances
//! by plain string comparison.
//!
//! Tokens are validated at construction; an `AcademicYear` that exists is
//! always well-formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing an academic year token
#[derive(Debug, Error, PartialEq, Eq)]
pub enum YearError {
    #[error("Malformed academic year token '{token}': expected YYYY-YY (e.g. 2023-24)")]
    Malformed { token: String },

    #[error("Academic year '{token}' must span consecutive years (e.g. 2023-24, not 2023-25)")]
    NonConsecutive { token: String },
}

/// Validated academic year token
///
/// Ordering is string ordering, which the canonical format guarantees to be
/// chronological.
///
/// # Example
/// ```
/// use fee_ledger_core_rs::models::AcademicYear;
///
/// let y1 = AcademicYear::parse("2022-23").unwrap();
/// let y2 = AcademicYear::parse("2023-24").unwrap();
/// assert!(y1 < y2);
/// assert!(AcademicYear::parse("2023-2024").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear(String);

impl AcademicYear {
    /// Parse and validate a `"YYYY-YY"` token
    ///
    /// # Errors
    /// - `YearError::Malformed` if the token is not four digits, a dash, and
    ///   two digits
    /// - `YearError::NonConsecutive` if the suffix is not the start year + 1
    ///   (mod 100, zero-padded)
    pub fn parse(token: &str) -> Result<Self, YearError> {
        let malformed = || YearError::Malformed {
            token: token.to_string(),
        };

        let bytes = token.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(malformed());
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit)
        {
            return Err(malformed());
        }

        let start: u16 = token[..4].parse().map_err(|_| malformed())?;
        let suffix: u16 = token[5..].parse().map_err(|_| malformed())?;

        if suffix != (start + 1) % 100 {
            return Err(YearError::NonConsecutive {
                token: token.to_string(),
            });
        }

        Ok(Self(token.to_string()))
    }

    /// Get the canonical token (e.g. `"2023-24"`)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the calendar year the academic year starts in
    pub fn start_year(&self) -> u16 {
        // Valid by construction: first four bytes are digits
        self.0[..4].parse().unwrap_or(0)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = YearError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::parse(&token)
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> Self {
        year.0
    }
}
