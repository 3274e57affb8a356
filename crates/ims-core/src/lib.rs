//! # ims-core: Pure Business Logic for Smart-IMS
//!
//! This crate holds the domain model of the inventory system as pure types
//! and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Smart-IMS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation (HTTP routes, React UI) - external         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ims-api (request/response contract)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ims-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Money   │  │  product  │                  │   │
//! │  │   │ Sale, Log │  │  (cents)  │  │  fields   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ims-db (SQLite store + stock ledger)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Sale, StockLog, stats)
//! - [`money`] - Checked line totals and `$x.yy` formatting over i64 cents
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation of product and ledger input
//!
//! ## Example Usage
//!
//! ```rust
//! use ims_core::validation::validate_margin;
//! use ims_core::Money;
//!
//! // $10.00 selling price over a $6.00 purchasing price
//! assert!(validate_margin(1000, 600).is_ok());
//!
//! let total = Money::from_cents(1000).checked_multiply_quantity(5).unwrap();
//! assert_eq!(total.to_string(), "$50.00");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Reason recorded on the stock log for every sale.
pub const SALE_REASON: &str = "Sale";

/// Reason used by a restock when the caller leaves it blank.
pub const DEFAULT_RESTOCK_REASON: &str = "Manual restock";

/// Reason recorded when a product is created with stock on hand.
pub const INITIAL_STOCK_REASON: &str = "Initial stock";

/// Reason recorded when an edit raises the stock level.
pub const STOCK_ADJUSTMENT_REASON: &str = "Stock adjustment";

/// Reason recorded when an edit lowers the stock level.
pub const STOCK_REDUCTION_REASON: &str = "Stock reduction";

/// Minimum stock level assumed when a new product does not specify one.
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 5;

/// Number of days covered by the dashboard sales trend (today included).
pub const SALES_TREND_DAYS: usize = 7;

/// Default cap on the recent-sales listing.
pub const DEFAULT_RECENT_SALES_LIMIT: u32 = 100;
