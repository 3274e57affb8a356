//! # Database Error Types
//!
//! Error types for store access and ledger operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (business rule)          │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ◄──────────── DbError::Domain                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (ims-api) ← code + message for the presentation layer        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ims_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
///
/// Store failures carry the sqlx message for logs; business rule
/// violations travel unchanged inside [`DbError::Domain`].
#[derive(Debug, Error)]
pub enum DbError {
    /// A ledger or catalogue rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - Lookup by a key that isn't covered by a domain error
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Concurrent insert of the same SKU
    /// - Any UNIQUE index violation not caught by a pre-check
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing non-existent category_id
    /// - Referencing non-existent product_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - CHECK constraint violated
    /// - Database locked past the busy timeout
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Wraps a sqlx error raised while opening or committing a transaction.
    pub fn transaction(err: sqlx::Error) -> Self {
        match DbError::from(err) {
            DbError::Internal(msg) | DbError::QueryFailed(msg) => DbError::TransactionFailed(msg),
            other => other,
        }
    }

    /// True for failures of the store itself, as opposed to rejected input.
    ///
    /// ```text
    /// Domain, NotFound, UniqueViolation, ForeignKeyViolation → false
    /// Connection, Migration, Query, Transaction, Pool, Internal → true
    /// ```
    pub fn is_store_unavailable(&self) -> bool {
        !matches!(
            self,
            DbError::Domain(_)
                | DbError::NotFound { .. }
                | DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
        )
    }

    /// Returns the domain error, if this is one.
    pub fn as_domain(&self) -> Option<&CoreError> {
        match self {
            DbError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_classification() {
        assert!(DbError::PoolExhausted.is_store_unavailable());
        assert!(DbError::ConnectionFailed("gone".into()).is_store_unavailable());
        assert!(DbError::QueryFailed("locked".into()).is_store_unavailable());

        let domain = DbError::from(CoreError::ProductNotFound(9));
        assert!(!domain.is_store_unavailable());
        assert!(matches!(
            domain.as_domain(),
            Some(CoreError::ProductNotFound(9))
        ));
        assert!(!DbError::duplicate("sku", "WM-001").is_store_unavailable());
    }

    #[test]
    fn test_validation_error_lifts_into_domain() {
        let err: DbError = ValidationError::NothingToUpdate.into();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::NothingToUpdate))
        ));
    }

    #[test]
    fn test_domain_message_is_transparent() {
        let err = DbError::from(CoreError::InvalidQuantity { quantity: 0 });
        assert_eq!(err.to_string(), "Quantity must be between 1 and 1000000 (got 0)");
    }
}
