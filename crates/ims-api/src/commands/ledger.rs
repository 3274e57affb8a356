//! # Ledger Commands
//!
//! Sales, restocks and the stock log audit trail.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Record Sale Flow                                     │
//! │                                                                         │
//! │  POST /api/sales { product_id: 7, quantity: 5 }                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  record_sale(&db, RecordSaleRequest)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────── one transaction ───────────────┐                     │
//! │  │ UPDATE stock WHERE stock >= 5  (0 rows → err) │                     │
//! │  │ INSERT sale                                    │                     │
//! │  │ INSERT stock_log (−5, "Sale")                  │                     │
//! │  └────────────────────────────────────────────────┘                     │
//! │       │                                                                 │
//! │       ├── Ok  → SaleResponse { sale_id, total_cents, remaining_stock } │
//! │       └── Err → INSUFFICIENT_STOCK / PRODUCT_NOT_FOUND /               │
//! │                 INVALID_QUANTITY, nothing written                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use ims_core::StockLog;
use ims_db::Database;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordSaleRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Result of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleResponse {
    pub message: String,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub remaining_stock: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestockRequest {
    pub product_id: i64,
    pub quantity: i64,
    /// Free text; blank falls back to "Manual restock"
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockResponse {
    pub message: String,
    pub product_id: i64,
    pub new_stock: i64,
    pub log_id: i64,
}

/// One row of a product's stock history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLogDto {
    pub id: i64,
    pub product_id: i64,
    pub delta: i64,
    pub reason: String,
    pub logged_at: String,
}

impl From<StockLog> for StockLogDto {
    fn from(log: StockLog) -> Self {
        StockLogDto {
            id: log.id,
            product_id: log.product_id,
            delta: log.delta,
            reason: log.reason,
            logged_at: log.logged_at.to_rfc3339(),
        }
    }
}

/// Records a sale of `quantity` units.
///
/// ## Errors
/// * `INVALID_QUANTITY` - quantity ≤ 0
/// * `PRODUCT_NOT_FOUND` - unknown product
/// * `INSUFFICIENT_STOCK` - more units requested than on hand
pub async fn record_sale(db: &Database, request: RecordSaleRequest) -> Result<SaleResponse, ApiError> {
    debug!(product_id = request.product_id, quantity = request.quantity, "record_sale command");

    let receipt = db
        .ledger()
        .record_sale(request.product_id, request.quantity)
        .await?;

    let total = receipt.sale.total();
    info!(
        sale_id = receipt.sale.id,
        total = %total,
        remaining = receipt.remaining_stock,
        "Sale recorded"
    );

    Ok(SaleResponse {
        message: format!(
            "Sold {} x {} for {}",
            receipt.sale.quantity, receipt.product_name, total
        ),
        sale_id: receipt.sale.id,
        product_id: receipt.sale.product_id,
        quantity: receipt.sale.quantity,
        unit_price_cents: receipt.sale.unit_price_cents,
        total_cents: receipt.sale.total_cents,
        remaining_stock: receipt.remaining_stock,
    })
}

/// Adds `quantity` units to a product.
///
/// ## Errors
/// * `INVALID_QUANTITY` - quantity ≤ 0
/// * `PRODUCT_NOT_FOUND` - unknown product
/// * `VALIDATION_FAILED` - reason longer than 200 characters
pub async fn restock(db: &Database, request: RestockRequest) -> Result<RestockResponse, ApiError> {
    debug!(product_id = request.product_id, quantity = request.quantity, "restock command");

    let receipt = db
        .ledger()
        .restock(request.product_id, request.quantity, request.reason.as_deref())
        .await?;

    info!(
        product_id = receipt.product_id,
        new_stock = receipt.new_stock,
        reason = %receipt.log.reason,
        "Restock recorded"
    );

    Ok(RestockResponse {
        message: format!(
            "Restocked {} by {} (now {})",
            receipt.product_name, receipt.log.delta, receipt.new_stock
        ),
        product_id: receipt.product_id,
        new_stock: receipt.new_stock,
        log_id: receipt.log.id,
    })
}

/// Stock history of one product, newest first.
///
/// ## Errors
/// `PRODUCT_NOT_FOUND` for an unknown product, so an empty list always
/// means "no movements yet".
pub async fn list_stock_logs(db: &Database, product_id: i64) -> Result<Vec<StockLogDto>, ApiError> {
    debug!(product_id, "list_stock_logs command");

    db.products().get_by_id(product_id).await?;
    let logs = db.stock_logs().list_for_product(product_id).await?;

    Ok(logs.into_iter().map(StockLogDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use ims_core::NewProduct;
    use ims_db::DbConfig;

    async fn setup_with_widget(stock: i64) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                name: "Widget".to_string(),
                sku: "WID-001".to_string(),
                category_id: 1,
                price_cents: 1000,
                purchasing_price_cents: 600,
                stock_quantity: stock,
                min_stock_level: Some(5),
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_record_sale() {
        let (db, id) = setup_with_widget(20).await;

        let response = record_sale(
            &db,
            RecordSaleRequest {
                product_id: id,
                quantity: 5,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.remaining_stock, 15);
        assert_eq!(response.quantity, 5);
        assert_eq!(response.unit_price_cents, 1000);
        assert_eq!(response.total_cents, 5000);
        assert_eq!(response.message, "Sold 5 x Widget for $50.00");
    }

    #[tokio::test]
    async fn test_record_sale_errors() {
        let (db, id) = setup_with_widget(3).await;

        let err = record_sale(&db, RecordSaleRequest { product_id: id, quantity: 5 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock. Available: 3, Requested: 5");

        let err = record_sale(&db, RecordSaleRequest { product_id: 999, quantity: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);

        let err = record_sale(&db, RecordSaleRequest { product_id: id, quantity: 0 })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn test_restock_and_history() {
        let (db, id) = setup_with_widget(20).await;

        let response = restock(
            &db,
            RestockRequest {
                product_id: id,
                quantity: 10,
                reason: Some("   ".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(response.new_stock, 30);

        let logs = list_stock_logs(&db, id).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, response.log_id);
        assert_eq!(logs[0].delta, 10);
        assert_eq!(logs[0].reason, "Manual restock");
        assert_eq!(logs[1].reason, "Initial stock");

        let err = list_stock_logs(&db, 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn test_restock_rejects_non_positive() {
        let (db, id) = setup_with_widget(20).await;

        let err = restock(
            &db,
            RestockRequest {
                product_id: id,
                quantity: -4,
                reason: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }
}
