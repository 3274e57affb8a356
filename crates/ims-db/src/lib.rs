//! # ims-db: Store and Stock Ledger for Smart-IMS
//!
//! This crate owns durability: the SQLite schema, the connection pool, the
//! atomic stock ledger and the read-only query service.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Smart-IMS Data Flow                              │
//! │                                                                         │
//! │  ims-api command (record_sale, dashboard_stats, ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ims-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ LedgerRepo    │    │ 001_schema   │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 002_category │  │   │
//! │  │   │ busy_timeout  │    │ StatsRepo ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          SQLite Database (WAL, single file)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Ledger and query repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ims_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("inventory.db")).await?;
//!
//! let receipt = db.ledger().record_sale(product_id, 3).await?;
//! println!("{} left", receipt.remaining_stock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::stats::StatsRepository;
pub use repository::stock_log::StockLogRepository;
