//! # Stock Log Repository
//!
//! The append-only audit trail of stock changes. Rows are written only by
//! the ledger and product repositories, inside their own transactions, via
//! [`append`]. This repository exposes the read side.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use ims_core::StockLog;

/// Appends a ledger row on an open transaction and returns it.
pub(crate) async fn append(
    conn: &mut SqliteConnection,
    product_id: i64,
    delta: i64,
    reason: &str,
    at: DateTime<Utc>,
) -> DbResult<StockLog> {
    let log = sqlx::query_as::<_, StockLog>(
        r#"
        INSERT INTO stock_logs (product_id, delta, reason, logged_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, product_id, delta, reason, logged_at
        "#,
    )
    .bind(product_id)
    .bind(delta)
    .bind(reason)
    .bind(at)
    .fetch_one(&mut *conn)
    .await?;

    debug!(product_id, delta, reason, log_id = log.id, "Stock log appended");
    Ok(log)
}

/// Repository for reading stock logs.
#[derive(Debug, Clone)]
pub struct StockLogRepository {
    pool: SqlitePool,
}

impl StockLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockLogRepository { pool }
    }

    /// Lists the log of one product, newest first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<StockLog>> {
        debug!(product_id, "Listing stock logs");

        let logs = sqlx::query_as::<_, StockLog>(
            r#"
            SELECT id, product_id, delta, reason, logged_at
            FROM stock_logs
            WHERE product_id = ?1
            ORDER BY logged_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Net stock change recorded for a product. Equals the current stock
    /// for any product whose changes all went through the ledger.
    pub async fn net_delta(&self, product_id: i64) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(delta), 0) FROM stock_logs WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
