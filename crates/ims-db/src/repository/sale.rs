//! # Sale Repository
//!
//! Read side of the sales table. Sales are written only by
//! [`LedgerRepository::record_sale`](crate::repository::ledger::LedgerRepository::record_sale)
//! and never updated or deleted.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use ims_core::{Sale, SaleSummary};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, quantity, unit_price_cents, total_cents, sold_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists the most recent sales with product name and SKU, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleSummary>> {
        debug!(limit, "Listing recent sales");

        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT
                s.id,
                s.product_id,
                p.name AS product_name,
                p.sku,
                s.quantity,
                s.unit_price_cents,
                s.total_cents,
                s.sold_at
            FROM sales s
            INNER JOIN products p ON p.id = s.product_id
            ORDER BY s.sold_at DESC, s.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists every sale of one product, oldest first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, quantity, unit_price_cents, total_cents, sold_at
            FROM sales
            WHERE product_id = ?1
            ORDER BY sold_at, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
