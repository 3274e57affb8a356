//! # Stock Ledger
//!
//! Sales and restocks: the two operations that move stock on their own.
//! Each runs in exactly one transaction and either commits every row it
//! writes or none of them.
//!
//! ## Record Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(product_id, qty)                                          │
//! │       │                                                                 │
//! │       ├── qty out of range? → InvalidQuantity (store never touched)    │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  UPDATE products                                                       │
//! │     SET stock_quantity = stock_quantity - qty                          │
//! │   WHERE id = ? AND stock_quantity >= qty      ← check + act in one     │
//! │   RETURNING ...                                  statement             │
//! │       │                                                                 │
//! │       ├── no row → SELECT: missing? ProductNotFound                    │
//! │       │                     else   InsufficientStock                   │
//! │       │            (ROLLBACK on drop)                                   │
//! │       ▼                                                                 │
//! │  INSERT sales       (unit_price snapshot, total = qty × price)         │
//! │  INSERT stock_logs  (delta = -qty, reason = "Sale")                    │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The conditional decrement is the first statement of the transaction, so
//! it is the statement that takes SQLite's write lock. A second seller
//! waits on the busy handler and then sees the committed stock, never a
//! stale read. Two sales of 3 against stock 5: one succeeds, the other
//! gets `InsufficientStock`, stock ends at 2.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::stock_log;
use ims_core::validation::{normalize_restock_reason, validate_quantity, MAX_STOCK_QUANTITY};
use ims_core::{CoreError, Money, RestockReceipt, Sale, SaleReceipt, ValidationError, SALE_REASON};

/// Product fields returned by the conditional stock update.
#[derive(Debug, FromRow)]
struct StockRow {
    name: String,
    price_cents: i64,
    stock_quantity: i64,
}

/// Explains why a conditional decrement matched no row.
async fn rejection_reason(
    conn: &mut SqliteConnection,
    product_id: i64,
    requested: i64,
) -> DbResult<CoreError> {
    let row: Option<(String, i64)> =
        sqlx::query_as("SELECT sku, stock_quantity FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(match row {
        None => CoreError::ProductNotFound(product_id),
        Some((sku, available)) => CoreError::InsufficientStock {
            sku,
            available,
            requested,
        },
    })
}

/// Repository for stock-moving ledger operations.
///
/// ## Usage
/// ```rust,ignore
/// let receipt = db.ledger().record_sale(product_id, 5).await?;
/// let restock = db.ledger().restock(product_id, 10, Some("supplier")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Records a sale at the current time.
    pub async fn record_sale(&self, product_id: i64, quantity: i64) -> DbResult<SaleReceipt> {
        self.record_sale_at(product_id, quantity, Utc::now()).await
    }

    /// Records a sale with an explicit timestamp.
    ///
    /// ## Errors
    /// * `InvalidQuantity` - quantity outside 1..=MAX_STOCK_QUANTITY, checked
    ///   before store access
    /// * `ProductNotFound` - no such product
    /// * `InsufficientStock` - quantity exceeds stock on hand
    pub async fn record_sale_at(
        &self,
        product_id: i64,
        quantity: i64,
        sold_at: DateTime<Utc>,
    ) -> DbResult<SaleReceipt> {
        validate_quantity(quantity)?;

        debug!(product_id, quantity, "Recording sale");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let updated = sqlx::query_as::<_, StockRow>(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            RETURNING name, price_cents, stock_quantity
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(sold_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product) = updated else {
            let reason = rejection_reason(&mut tx, product_id, quantity).await?;
            warn!(product_id, quantity, error = %reason, "Sale rejected");
            return Err(reason.into());
        };

        let total_cents = Money::from_cents(product.price_cents)
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| DbError::Internal("sale total overflows".to_string()))?
            .cents();

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (product_id, quantity, unit_price_cents, total_cents, sold_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, product_id, quantity, unit_price_cents, total_cents, sold_at
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(product.price_cents)
        .bind(total_cents)
        .bind(sold_at)
        .fetch_one(&mut *tx)
        .await?;

        stock_log::append(&mut tx, product_id, -quantity, SALE_REASON, sold_at).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            product_id,
            sale_id = sale.id,
            quantity,
            total_cents,
            remaining = product.stock_quantity,
            "Sale recorded"
        );

        Ok(SaleReceipt {
            sale,
            product_name: product.name,
            remaining_stock: product.stock_quantity,
        })
    }

    /// Adds stock to a product.
    ///
    /// A blank or absent reason is recorded as "Manual restock". The new
    /// level may not exceed `MAX_STOCK_QUANTITY`; the bound is part of the
    /// conditional update, like the sale's stock check.
    pub async fn restock(
        &self,
        product_id: i64,
        quantity: i64,
        reason: Option<&str>,
    ) -> DbResult<RestockReceipt> {
        validate_quantity(quantity)?;
        let reason = normalize_restock_reason(reason)?;
        let now = Utc::now();

        debug!(product_id, quantity, reason = %reason, "Restocking product");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let updated = sqlx::query_as::<_, StockRow>(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock_quantity + ?2 <= ?4
            RETURNING name, price_cents, stock_quantity
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .bind(MAX_STOCK_QUANTITY)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product) = updated else {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                    .bind(product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let err: DbError = match exists {
                None => CoreError::ProductNotFound(product_id).into(),
                Some(_) => ValidationError::TooLarge {
                    field: "stock_quantity".to_string(),
                    max: MAX_STOCK_QUANTITY,
                }
                .into(),
            };
            warn!(product_id, quantity, error = %err, "Restock rejected");
            return Err(err);
        };

        let log = stock_log::append(&mut tx, product_id, quantity, &reason, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            product_id,
            quantity,
            new_stock = product.stock_quantity,
            "Product restocked"
        );

        Ok(RestockReceipt {
            product_id,
            product_name: product.name,
            new_stock: product.stock_quantity,
            log,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
