//! # Commands Module
//!
//! Every call a presentation layer can make, as plain async functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Product list, lookup, create, update
//! ├── ledger.rs     ◄─── Sales, restocks, stock history
//! ├── dashboard.rs  ◄─── Dashboard aggregates, recent sales
//! ├── category.rs   ◄─── Category list
//! └── health.rs     ◄─── Store liveness
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Host (HTTP router, CLI, job)                                           │
//! │  ────────────────────────────                                           │
//! │  POST /api/sales  { "product_id": 7, "quantity": 2 }                    │
//! │         │                                                               │
//! │         │ (host deserializes the body)                                  │
//! │         ▼                                                               │
//! │  ims-api                                                                │
//! │  ───────                                                                │
//! │  async fn record_sale(                                                  │
//! │      db: &Database,              ◄── Shared pool handle                 │
//! │      request: RecordSaleRequest, ◄── Typed body                         │
//! │  ) -> Result<SaleResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (host serializes, status from ApiError::http_status)          │
//! │         ▼                                                               │
//! │  { "code": "INSUFFICIENT_STOCK", "message": "..." }  422                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod dashboard;
pub mod health;
pub mod ledger;
pub mod product;

pub use category::*;
pub use dashboard::*;
pub use health::*;
pub use ledger::*;
pub use product::*;
