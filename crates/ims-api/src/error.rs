//! # API Error Type
//!
//! Unified error type for the collaborator contract.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Smart-IMS                              │
//! │                                                                         │
//! │  Command Function → Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── Domain(ProductNotFound)     → PRODUCT_NOT_FOUND    404      │
//! │         ├── Domain(Validation)          → VALIDATION_FAILED    400      │
//! │         ├── Domain(DuplicateSku)        → DUPLICATE_SKU        409      │
//! │         ├── Domain(InsufficientStock)   → INSUFFICIENT_STOCK   422      │
//! │         ├── Domain(InvalidQuantity)     → INVALID_QUANTITY     400      │
//! │         └── store failure               → STORE_UNAVAILABLE    503      │
//! │                (logged with tracing::error!, generic message out)       │
//! │                                                                         │
//! │  Host serializes:                                                       │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "Insufficient stock. Available: 3, Requested: 5" }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ims_core::{CoreError, ValidationError};
use ims_db::DbError;
use serde::Serialize;

/// API error returned from every command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_FAILED",
///   "message": "price (500) must be greater than purchasing_price (600)",
///   "field": "price"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending field, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.code) {
///   case 'INSUFFICIENT_STOCK':
///     showNotification(e.message);
///     break;
///   case 'VALIDATION_FAILED':
///     highlightField(e.field);
///     break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No product with the requested id (404)
    ProductNotFound,

    /// Some other record is missing (404)
    NotFound,

    /// Input failed a field or cross-field rule (400)
    ValidationFailed,

    /// SKU already taken by another product (409)
    DuplicateSku,

    /// Sale larger than the stock on hand (422)
    InsufficientStock,

    /// Ledger quantity not strictly positive (400)
    InvalidQuantity,

    /// The store could not complete the operation (503)
    StoreUnavailable,
}

impl ErrorCode {
    /// HTTP status a web host should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::ProductNotFound | ErrorCode::NotFound => 404,
            ErrorCode::ValidationFailed | ErrorCode::InvalidQuantity => 400,
            ErrorCode::DuplicateSku => 409,
            ErrorCode::InsufficientStock => 422,
            ErrorCode::StoreUnavailable => 503,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates a validation error naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a store failure with a generic message.
    pub fn store_unavailable() -> Self {
        ApiError::new(
            ErrorCode::StoreUnavailable,
            "The inventory store is unavailable, please retry",
        )
    }

    /// HTTP status a web host should answer with.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.field().to_string(), err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => {
                ApiError::new(ErrorCode::ProductNotFound, format!("Product not found: {}", id))
            }
            CoreError::DuplicateSku { sku } => {
                ApiError::new(ErrorCode::DuplicateSku, format!("SKU '{}' already exists", sku))
            }
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock. Available: {}, Requested: {}",
                    available, requested
                ),
            ),
            err @ CoreError::InvalidQuantity { .. } => {
                ApiError::new(ErrorCode::InvalidQuantity, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts database errors to API errors.
///
/// Store failures are logged in full here and leave with a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => e.into(),
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } if field.contains("sku") => {
                ApiError::new(ErrorCode::DuplicateSku, format!("SKU '{}' already exists", value))
            }
            DbError::UniqueViolation { field, .. } => {
                ApiError::validation(field.clone(), format!("{} already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationFailed, "Invalid reference")
            }
            other => {
                tracing::error!(error = %other, "Store failure");
                ApiError::store_unavailable()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
