//! # Error Types
//!
//! Domain-specific error types for ims-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ims-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  ims-db errors (separate crate)                                        │
//! │  └── DbError          - Store failures, wraps CoreError                │
//! │                                                                         │
//! │  ims-api errors                                                        │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the stock ledger and product catalogue.
///
/// Every variant is recoverable: the caller corrects the input and retries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product has the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Another product already uses this SKU.
    #[error("SKU '{sku}' already exists")]
    DuplicateSku { sku: String },

    /// The sale asks for more units than are on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 5)
    ///      │
    ///      ▼
    /// Conditional decrement finds stock=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "SKU-1042-001", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock. Available: 3, Requested: 5"
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Ledger quantities run from 1 to `MAX_STOCK_QUANTITY`.
    #[error(
        "Quantity must be between 1 and {max} (got {quantity})",
        max = crate::validation::MAX_STOCK_QUANTITY
    )]
    InvalidQuantity { quantity: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant names the offending field so the presentation layer can
/// highlight it; see [`ValidationError::field`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value exceeds the largest amount the store accepts.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., SKU with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Selling price does not exceed the purchasing price.
    #[error("price ({price_cents}) must be greater than purchasing_price ({purchasing_price_cents})")]
    PriceNotAboveCost {
        price_cents: i64,
        purchasing_price_cents: i64,
    },

    /// The referenced category does not exist.
    #[error("category_id {category_id} does not reference an existing category")]
    UnknownCategory { category_id: i64 },

    /// An update carried no fields.
    #[error("No fields to update")]
    NothingToUpdate,
}

impl ValidationError {
    /// Name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::PriceNotAboveCost { .. } => "price",
            ValidationError::UnknownCategory { .. } => "category_id",
            ValidationError::NothingToUpdate => "fields",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "SKU-1042-001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for SKU-1042-001: available 3, requested 5"
        );

        let err = CoreError::ProductNotFound(999);
        assert_eq!(err.to_string(), "Product not found: 999");
    }

    #[test]
    fn test_validation_error_fields() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.field(), "sku");
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::PriceNotAboveCost {
            price_cents: 500,
            purchasing_price_cents: 500,
        };
        assert_eq!(err.field(), "price");

        assert_eq!(
            ValidationError::UnknownCategory { category_id: 42 }.field(),
            "category_id"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::NothingToUpdate;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
