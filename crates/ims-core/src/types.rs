//! # Domain Types
//!
//! Core domain types used throughout Smart-IMS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    Product      │──►│      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id, sku        │   │  quantity       │       │
//! │  │  name (unique)  │   │  price_cents    │   │  unit_price     │       │
//! │  └─────────────────┘   │  stock_quantity │   │  total          │       │
//! │                        └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                        ┌─────────────────┐                              │
//! │                        │    StockLog     │  append-only ledger          │
//! │                        │  delta, reason  │  (sale, restock, adjust)     │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money Fields
//! Every monetary column is an `i64` in cents, so rows map straight from
//! SQLite and arithmetic stays exact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category. Seeded by migration, never edited through the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product as read from the store, joined with its category name.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit, unique across products.
    pub sku: String,

    pub category_id: i64,

    /// Joined from `categories.name`.
    pub category_name: String,

    /// Selling price in cents.
    pub price_cents: i64,

    /// Purchasing (cost) price in cents. Always below `price_cents`.
    pub purchasing_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    /// At or below this level the product counts as low stock.
    pub min_stock_level: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Classifies the stock level for reports.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock_quantity, self.min_stock_level)
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Stock classification shown on the inventory report.
///
/// ```text
/// stock == 0            → OutOfStock
/// 0 < stock <= min      → LowStock
/// stock > min           → InStock
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn classify(stock_quantity: i64, min_stock_level: i64) -> Self {
        if stock_quantity <= 0 {
            StockStatus::OutOfStock
        } else if stock_quantity <= min_stock_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of a single product.
///
/// Uses the snapshot pattern: `unit_price_cents` freezes the product price
/// at the moment of sale, so later price edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    /// Units sold, always > 0.
    pub quantity: i64,
    /// Product price at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A sale joined with the product it refers to, for the sales listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleSummary {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

// =============================================================================
// Stock Log
// =============================================================================

/// One entry of the append-only stock ledger.
///
/// `delta` is the net change applied to `stock_quantity` in the same
/// transaction: negative for sales and reductions, positive for restocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockLog {
    pub id: i64,
    pub product_id: i64,
    pub delta: i64,
    pub reason: String,
    #[ts(as = "String")]
    pub logged_at: DateTime<Utc>,
}

// =============================================================================
// Ledger Inputs
// =============================================================================

/// Input for creating a product. Validated by [`NewProduct::validate`]
/// before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category_id: i64,
    pub price_cents: i64,
    pub purchasing_price_cents: i64,
    pub stock_quantity: i64,
    /// Defaults to [`crate::DEFAULT_MIN_STOCK_LEVEL`].
    pub min_stock_level: Option<i64>,
}

/// Partial product update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<i64>,
    pub price_cents: Option<i64>,
    pub purchasing_price_cents: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub min_stock_level: Option<i64>,
}

impl ProductPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.category_id.is_none()
            && self.price_cents.is_none()
            && self.purchasing_price_cents.is_none()
            && self.stock_quantity.is_none()
            && self.min_stock_level.is_none()
    }
}

/// Filter for the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or SKU.
    pub search: Option<String>,
    /// Only products at or below their minimum stock level.
    pub low_stock_only: bool,
}

// =============================================================================
// Ledger Results
// =============================================================================

/// What a successful sale returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub product_name: String,
    pub remaining_stock: i64,
}

/// What a successful restock returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestockReceipt {
    pub product_id: i64,
    pub product_name: String,
    pub new_stock: i64,
    pub log: StockLog,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Revenue for one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_cents: i64,
}

/// Aggregates shown on the dashboard, read from one consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    /// Σ price × stock_quantity.
    pub total_value_cents: i64,
    /// Σ (unit_price − purchasing_price) × quantity over all sales.
    pub total_profit_cents: i64,
    /// Σ (price − purchasing_price) × stock_quantity.
    pub potential_profit_cents: i64,
    pub low_stock_count: i64,
    pub total_orders: i64,
    /// Exactly seven days, oldest first, ending today.
    pub sales_trend: Vec<DailySales>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min: i64) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            name: "Wireless Mouse".to_string(),
            sku: "WM-001".to_string(),
            category_id: 1,
            category_name: "Electronics".to_string(),
            price_cents: 1000,
            purchasing_price_cents: 600,
            stock_quantity: stock,
            min_stock_level: min,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stock_status_boundaries() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(6, 5), StockStatus::InStock);
        assert_eq!(StockStatus::classify(0, 0), StockStatus::OutOfStock);
    }

    #[test]
    fn test_product_stock_status() {
        assert_eq!(product(20, 5).stock_status(), StockStatus::InStock);
        assert_eq!(product(3, 5).stock_status(), StockStatus::LowStock);
        assert_eq!(product(0, 5).stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            min_stock_level: Some(2),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_stock_status_serializes_snake_case() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
        assert_eq!(StockStatus::LowStock.label(), "Low Stock");
    }
}
