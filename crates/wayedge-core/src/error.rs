//! Error types for the wayedge console.

use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum WayedgeError {
    /// No caller identity, or the identity names a tenant that no longer
    /// exists. Checked before any ownership lookup.
    #[error("Unauthorized")]
    Unauthorized,

    /// The entity does not exist or is not owned by the caller. Never
    /// carries more than the identifier the caller supplied.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Quota exceeded: at most {limit} websites per tenant")]
    QuotaExceeded { limit: u64 },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WayedgeError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<ValidationErrors> for WayedgeError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type WayedgeResult<T> = Result<T, WayedgeError>;
