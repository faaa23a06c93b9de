//! Domain Error Types
//!
//! Validation errors raised before anything reaches the store.

use thiserror::Error;

/// Field-level validation failures.
///
/// These are always the caller's fault and map to 400 at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Required text field is empty or whitespace
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Text field exceeds its maximum length
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric field below zero
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: String },

    /// Numeric field must be at least one
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: String },

    /// Decimal value with more fractional digits than allowed
    #[error("{field} has too many decimal places (max {max}, got {got})")]
    TooManyDecimals {
        field: &'static str,
        max: u32,
        got: u32,
    },

    /// Numeric field outside its allowed range
    #[error("{field} is out of range (got {value})")]
    OutOfRange { field: &'static str, value: String },

    /// Identifier with characters outside [A-Za-z0-9_-]
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Same stockId submitted twice in one request
    #[error("Duplicate stockId in request: {0}")]
    DuplicateStockId(String),
}

impl DomainError {
    /// Name of the offending field, if the error concerns a single field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyField(field)
            | Self::TooLong { field, .. }
            | Self::Negative { field, .. }
            | Self::NotPositive { field, .. }
            | Self::TooManyDecimals { field, .. }
            | Self::OutOfRange { field, .. } => Some(field),
            Self::InvalidIdentifier(_) | Self::DuplicateStockId(_) => None,
        }
    }
}
