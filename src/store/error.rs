//! Store Errors
//!
//! Error types for data-access operations.

/// Errors that can occur in a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this identifier
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Identifier already taken
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A referenced record does not exist
    #[error("Referenced {entity} does not exist: {id}")]
    MissingReference { entity: &'static str, id: String },

    /// Record is still referenced and cannot be removed
    #[error("{entity} {id} is still referenced by recorded transactions")]
    InUse { entity: &'static str, id: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn already_exists(entity: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.into(),
        }
    }

    pub fn missing_reference(entity: &'static str, id: impl Into<String>) -> Self {
        Self::MissingReference {
            entity,
            id: id.into(),
        }
    }

    pub fn in_use(entity: &'static str, id: impl Into<String>) -> Self {
        Self::InUse {
            entity,
            id: id.into(),
        }
    }

    /// Check if this error is a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Check if this error is a uniqueness or reference conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::AlreadyExists { .. } | StoreError::InUse { .. }
        )
    }
}
