//! Record identifiers
//!
//! Identifiers are strings on the wire. Clients may propose one (the
//! product form does); otherwise a UUID v4 is assigned here.

use uuid::Uuid;

use super::error::DomainError;

const MAX_ID_LEN: usize = 64;

/// Generate a fresh identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check a client-supplied identifier held in `field`
pub fn validate_id(field: &'static str, id: &str) -> Result<String, DomainError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    if id.len() > MAX_ID_LEN
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::InvalidIdentifier(id.to_string()));
    }
    Ok(id.to_string())
}

/// Use the proposed identifier if present, otherwise generate one
pub fn resolve_id(field: &'static str, proposed: Option<&str>) -> Result<String, DomainError> {
    match proposed {
        Some(id) if !id.trim().is_empty() => validate_id(field, id),
        _ => Ok(new_id()),
    }
}

/// Trim a required text field and enforce a length limit
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    if value.chars().count() > max {
        return Err(DomainError::TooLong { field, max });
    }
    Ok(value.to_string())
}

/// Trim an optional text field; empty is allowed
pub fn optional_text(field: &'static str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(DomainError::TooLong { field, max });
    }
    Ok(value.to_string())
}
