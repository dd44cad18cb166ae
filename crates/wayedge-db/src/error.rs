//! Database-specific error types and conversions.

use wayedge_core::error::WayedgeError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A statement inside a query failed (constraint, assertion, or an
    /// aborted transaction).
    #[error("Query failed: {0}")]
    Query(String),

    /// A stored value could not be mapped back to a domain type.
    #[error("Corrupt record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A write tripped a unique index.
    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl From<DbError> for WayedgeError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WayedgeError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => WayedgeError::AlreadyExists { entity },
            other => WayedgeError::Database(other.to_string()),
        }
    }
}
