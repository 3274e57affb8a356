//! # Repository Module
//!
//! Database repository implementations for Smart-IMS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories by Role                                 │
//! │                                                                         │
//! │  ims-api command                                                       │
//! │       │                                                                 │
//! │       ├── writes ──► LedgerRepository   record_sale, restock           │
//! │       │              ProductRepository  create, update                 │
//! │       │                                                                 │
//! │       └── reads ───► ProductRepository  list, get_by_id, get_by_sku    │
//! │                      CategoryRepository list                           │
//! │                      SaleRepository     list_recent                    │
//! │                      StockLogRepository list_for_product               │
//! │                      StatsRepository    dashboard                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Each repository holds a clone of the pool. Writes open their own      │
//! │  transaction; rows in sales and stock_logs are only ever appended.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod ledger;
pub mod product;
pub mod sale;
pub mod stats;
pub mod stock_log;
