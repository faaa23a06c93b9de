//! Form error types

use crate::client::ClientError;
use crate::domain::DomainError;

/// Rejected edit or invalid draft
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("{field} must be a number (got {input:?})")]
    InvalidNumber { field: &'static str, input: String },

    #[error("stock line {0} does not exist")]
    NoSuchLine(usize),

    #[error("name is required")]
    MissingName,

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Failed submission; the draft is kept
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Error creating product: {0}")]
    Client(#[from] ClientError),
}
