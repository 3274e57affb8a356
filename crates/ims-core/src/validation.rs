//! # Validation Module
//!
//! Input validation for products and ledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: ims-api (request DTOs)                                       │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure, before any store access)                  │
//! │  ├── Field rules: required, length, sign                               │
//! │  └── Cross-field rule: price > purchasing_price                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ims-db (inside the transaction)                              │
//! │  ├── Category exists, SKU unused                                       │
//! │  └── CHECK / UNIQUE / FOREIGN KEY constraints                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ims_core::validation::{validate_sku, validate_margin};
//!
//! assert!(validate_sku("WM-001").is_ok());
//! assert!(validate_margin(1000, 600).is_ok());
//! assert!(validate_margin(600, 600).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{NewProduct, Product, ProductPatch};
use crate::{DEFAULT_MIN_STOCK_LEVEL, DEFAULT_RESTOCK_REASON};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SKU_LEN: usize = 50;
pub const MAX_SEARCH_LEN: usize = 100;
pub const MAX_REASON_LEN: usize = 200;

/// Largest price or purchasing price, in cents ($1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Largest stock level, minimum level, or single sale/restock quantity.
///
/// With [`MAX_PRICE_CENTS`] this caps one product's stock value at 10^14
/// cents, so the dashboard sums stay exact integers for catalogues of up
/// to 92,000 products priced and stocked at the limits.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
/// - No control characters (tabs, newlines)
///
/// Any other text is a valid code: `ABC.123`, `A/B`, `SKU 42`.
///
/// ## Example
/// ```rust
/// use ims_core::validation::validate_sku;
///
/// assert!(validate_sku("WM-001").is_ok());
/// assert!(validate_sku("ABC.123").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if sku.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query, or `None` when nothing is left to search for.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    if query.is_empty() {
        Ok(None)
    } else {
        Ok(Some(query.to_string()))
    }
}

/// Normalizes a restock reason. Blank or absent becomes "Manual restock".
///
/// ## Example
/// ```rust
/// use ims_core::validation::normalize_restock_reason;
///
/// assert_eq!(normalize_restock_reason(None).unwrap(), "Manual restock");
/// assert_eq!(normalize_restock_reason(Some("  supplier ")).unwrap(), "supplier");
/// ```
pub fn normalize_restock_reason(reason: Option<&str>) -> ValidationResult<String> {
    let reason = reason.map(str::trim).unwrap_or_default();

    if reason.is_empty() {
        return Ok(DEFAULT_RESTOCK_REASON.to_string());
    }

    if reason.chars().count() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }

    Ok(reason.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a ledger quantity (sale or restock).
///
/// ## User Workflow
/// ```text
/// Record sale (qty: 0)
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty outside 1..=MAX_STOCK_QUANTITY? → InvalidQuantity,
///      │                                          store never touched
///      │
///      └── OK → conditional decrement
/// ```
pub fn validate_quantity(quantity: i64) -> CoreResult<()> {
    if !(1..=MAX_STOCK_QUANTITY).contains(&quantity) {
        return Err(CoreError::InvalidQuantity { quantity });
    }

    Ok(())
}

/// Selling price: 1 to `MAX_PRICE_CENTS`.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    at_most("price", cents, MAX_PRICE_CENTS)
}

/// Purchasing price may be zero (free samples) but not negative.
pub fn validate_purchasing_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "purchasing_price".to_string(),
        });
    }

    at_most("purchasing_price", cents, MAX_PRICE_CENTS)
}

/// Stock counts and minimum levels: 0 to `MAX_STOCK_QUANTITY`.
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    at_most(field, value, MAX_STOCK_QUANTITY)
}

fn at_most(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Selling price must exceed the purchasing price. Zero margin is rejected.
pub fn validate_margin(price_cents: i64, purchasing_price_cents: i64) -> ValidationResult<()> {
    if price_cents <= purchasing_price_cents {
        return Err(ValidationError::PriceNotAboveCost {
            price_cents,
            purchasing_price_cents,
        });
    }

    Ok(())
}

// =============================================================================
// Product Input
// =============================================================================

impl NewProduct {
    /// Checks every field rule, then the margin rule.
    ///
    /// Returns a copy with trimmed strings and the default minimum stock
    /// level filled in, ready to insert.
    pub fn validate(&self) -> ValidationResult<NewProduct> {
        validate_product_name(&self.name)?;
        validate_sku(&self.sku)?;
        validate_price_cents(self.price_cents)?;
        validate_purchasing_price_cents(self.purchasing_price_cents)?;
        validate_margin(self.price_cents, self.purchasing_price_cents)?;
        validate_stock_level("stock_quantity", self.stock_quantity)?;

        let min_stock_level = self.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL);
        validate_stock_level("min_stock_level", min_stock_level)?;

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            min_stock_level: Some(min_stock_level),
            ..self.clone()
        })
    }
}

impl ProductPatch {
    /// Validates only the supplied fields. The margin rule is checked here
    /// when both prices are present; otherwise on the merged product.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }

        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(sku) = &self.sku {
            validate_sku(sku)?;
        }
        if let Some(price) = self.price_cents {
            validate_price_cents(price)?;
        }
        if let Some(cost) = self.purchasing_price_cents {
            validate_purchasing_price_cents(cost)?;
        }
        if let (Some(price), Some(cost)) = (self.price_cents, self.purchasing_price_cents) {
            validate_margin(price, cost)?;
        }
        if let Some(stock) = self.stock_quantity {
            validate_stock_level("stock_quantity", stock)?;
        }
        if let Some(min) = self.min_stock_level {
            validate_stock_level("min_stock_level", min)?;
        }

        Ok(())
    }

    /// Merges the patch over `current` and re-checks the margin rule on
    /// the result.
    pub fn apply(&self, current: &Product) -> ValidationResult<Product> {
        let mut merged = current.clone();

        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(sku) = &self.sku {
            merged.sku = sku.trim().to_string();
        }
        if let Some(category_id) = self.category_id {
            merged.category_id = category_id;
        }
        if let Some(price) = self.price_cents {
            merged.price_cents = price;
        }
        if let Some(cost) = self.purchasing_price_cents {
            merged.purchasing_price_cents = cost;
        }
        if let Some(stock) = self.stock_quantity {
            merged.stock_quantity = stock;
        }
        if let Some(min) = self.min_stock_level {
            merged.min_stock_level = min;
        }

        validate_margin(merged.price_cents, merged.purchasing_price_cents)?;

        Ok(merged)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_product() -> NewProduct {
        NewProduct {
            name: " Wireless Mouse ".to_string(),
            sku: "WM-001".to_string(),
            category_id: 1,
            price_cents: 1000,
            purchasing_price_cents: 600,
            stock_quantity: 20,
            min_stock_level: None,
        }
    }

    fn stored_product() -> Product {
        let now = Utc::now();
        Product {
            id: 7,
            name: "Wireless Mouse".to_string(),
            sku: "WM-001".to_string(),
            category_id: 1,
            category_name: "Electronics".to_string(),
            price_cents: 1000,
            purchasing_price_cents: 600,
            stock_quantity: 20,
            min_stock_level: 5,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("WM-001").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("ABC.123").is_ok());
        assert!(validate_sku("A/B").is_ok());
        assert!(validate_sku("SKU 42").is_ok());
        assert!(validate_sku("12#4").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("A\tB").is_err());
        assert!(validate_sku("A\nB").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Wireless Mouse").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  mouse ").unwrap(), Some("mouse".to_string()));
        assert_eq!(validate_search_query("   ").unwrap(), None);
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        ));
        assert!(validate_quantity(-3).is_err());

        assert!(validate_quantity(MAX_STOCK_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(MAX_STOCK_QUANTITY + 1),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert!(validate_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_upper_bounds() {
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::TooLarge { max: MAX_PRICE_CENTS, .. })
        ));

        assert!(validate_purchasing_price_cents(MAX_PRICE_CENTS).is_ok());
        assert_eq!(
            validate_purchasing_price_cents(MAX_PRICE_CENTS + 1).unwrap_err().field(),
            "purchasing_price"
        );

        assert!(validate_stock_level("stock_quantity", MAX_STOCK_QUANTITY).is_ok());
        let err = validate_stock_level("stock_quantity", MAX_STOCK_QUANTITY + 1).unwrap_err();
        assert_eq!(err.field(), "stock_quantity");
        assert_eq!(err.to_string(), "stock_quantity must be at most 1000000");

        // The largest product the store accepts cannot overflow its stock value
        assert!(MAX_PRICE_CENTS.checked_mul(MAX_STOCK_QUANTITY).is_some());
    }

    #[test]
    fn test_restock_reason_defaults() {
        assert_eq!(normalize_restock_reason(None).unwrap(), "Manual restock");
        assert_eq!(normalize_restock_reason(Some("   ")).unwrap(), "Manual restock");
        assert_eq!(normalize_restock_reason(Some("supplier")).unwrap(), "supplier");

        let err = normalize_restock_reason(Some(&"r".repeat(201))).unwrap_err();
        assert_eq!(err.field(), "reason");
    }

    #[test]
    fn test_margin_rule() {
        assert!(validate_margin(1000, 600).is_ok());
        assert!(validate_margin(1000, 0).is_ok());
        assert!(validate_margin(600, 600).is_err());
        assert!(validate_margin(500, 600).is_err());
    }

    #[test]
    fn test_new_product_validate_normalizes() {
        let valid = new_product().validate().unwrap();
        assert_eq!(valid.name, "Wireless Mouse");
        assert_eq!(valid.min_stock_level, Some(DEFAULT_MIN_STOCK_LEVEL));
    }

    #[test]
    fn test_new_product_rejects_bad_fields() {
        let mut p = new_product();
        p.price_cents = 600;
        let err = p.validate().unwrap_err();
        assert_eq!(err.field(), "price");

        let mut p = new_product();
        p.stock_quantity = -1;
        assert_eq!(p.validate().unwrap_err().field(), "stock_quantity");

        let mut p = new_product();
        p.purchasing_price_cents = -1;
        assert_eq!(p.validate().unwrap_err().field(), "purchasing_price");

        let mut p = new_product();
        p.min_stock_level = Some(-2);
        assert_eq!(p.validate().unwrap_err().field(), "min_stock_level");

        let mut p = new_product();
        p.stock_quantity = MAX_STOCK_QUANTITY + 1;
        assert_eq!(p.validate().unwrap_err().field(), "stock_quantity");
    }

    #[test]
    fn test_patch_validate() {
        assert!(matches!(
            ProductPatch::default().validate(),
            Err(ValidationError::NothingToUpdate)
        ));

        let patch = ProductPatch {
            price_cents: Some(0),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err().field(), "price");

        let patch = ProductPatch {
            stock_quantity: Some(i64::MAX),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(ValidationError::TooLarge { ref field, .. }) if field == "stock_quantity"
        ));
    }

    #[test]
    fn test_patch_apply_rechecks_margin() {
        let current = stored_product();

        let patch = ProductPatch {
            purchasing_price_cents: Some(1000),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        assert!(patch.apply(&current).is_err());

        let patch = ProductPatch {
            stock_quantity: Some(12),
            name: Some("Mouse v2".to_string()),
            ..Default::default()
        };
        let merged = patch.apply(&current).unwrap();
        assert_eq!(merged.stock_quantity, 12);
        assert_eq!(merged.name, "Mouse v2");
        assert_eq!(merged.sku, current.sku);
    }
}
