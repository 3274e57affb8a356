//! # Dashboard Statistics
//!
//! Read-only aggregates over products and sales.
//!
//! ## Consistent Snapshot
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN (read)                                                          │
//! │  ├── Σ price × stock               → total_value_cents                 │
//! │  ├── Σ (price − cost) × stock      → potential_profit_cents            │
//! │  ├── COUNT stock <= min            → low_stock_count                   │
//! │  ├── COUNT sales                   → total_orders                      │
//! │  ├── Σ (unit_price − cost) × qty   → total_profit_cents                │
//! │  └── sales since (today − 6) 00:00 → bucketed per UTC day              │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Every figure comes from the same WAL snapshot, so a sale committing   │
//! │  mid-read cannot show up in total_orders but not in total_profit.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use ims_core::{DailySales, DashboardStats, SALES_TREND_DAYS};

#[derive(Debug, FromRow)]
struct InventoryTotals {
    total_value_cents: i64,
    potential_profit_cents: i64,
    low_stock_count: i64,
}

#[derive(Debug, FromRow)]
struct SalesTotals {
    total_orders: i64,
    total_profit_cents: i64,
}

/// The calendar days of the trend window, oldest first, ending on `today`.
pub fn trend_days(today: NaiveDate) -> Vec<NaiveDate> {
    (0..SALES_TREND_DAYS as i64)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

/// Sums per-sale totals into the trend window. Days without sales are 0;
/// sales outside the window are ignored.
pub fn bucket_sales_trend(
    today: NaiveDate,
    sales: impl IntoIterator<Item = (DateTime<Utc>, i64)>,
) -> Vec<DailySales> {
    let mut totals: BTreeMap<NaiveDate, i64> =
        trend_days(today).into_iter().map(|day| (day, 0)).collect();

    for (sold_at, total_cents) in sales {
        if let Some(day_total) = totals.get_mut(&sold_at.date_naive()) {
            *day_total += total_cents;
        }
    }

    totals
        .into_iter()
        .map(|(date, total_cents)| DailySales { date, total_cents })
        .collect()
}

#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Dashboard figures as of now.
    pub async fn dashboard(&self) -> DbResult<DashboardStats> {
        self.dashboard_at(Utc::now()).await
    }

    /// Dashboard figures with the trend window ending on `now`'s UTC date.
    pub async fn dashboard_at(&self, now: DateTime<Utc>) -> DbResult<DashboardStats> {
        let today = now.date_naive();
        let window_start = (today - Duration::days(SALES_TREND_DAYS as i64 - 1))
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DbError::Internal("invalid trend window start".to_string()))?
            .and_utc();

        debug!(%today, "Computing dashboard stats");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let inventory = sqlx::query_as::<_, InventoryTotals>(
            r#"
            SELECT
                COALESCE(SUM(price_cents * stock_quantity), 0) AS total_value_cents,
                COALESCE(SUM((price_cents - purchasing_price_cents) * stock_quantity), 0)
                    AS potential_profit_cents,
                COALESCE(SUM(CASE WHEN stock_quantity <= min_stock_level THEN 1 ELSE 0 END), 0)
                    AS low_stock_count
            FROM products
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let sales = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT
                COUNT(s.id) AS total_orders,
                COALESCE(SUM((s.unit_price_cents - p.purchasing_price_cents) * s.quantity), 0)
                    AS total_profit_cents
            FROM sales s
            INNER JOIN products p ON p.id = s.product_id
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let recent: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
            "SELECT sold_at, total_cents FROM sales WHERE sold_at >= ?1",
        )
        .bind(window_start)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await.map_err(DbError::transaction)?;

        let stats = DashboardStats {
            total_value_cents: inventory.total_value_cents,
            total_profit_cents: sales.total_profit_cents,
            potential_profit_cents: inventory.potential_profit_cents,
            low_stock_count: inventory.low_stock_count,
            total_orders: sales.total_orders,
            sales_trend: bucket_sales_trend(today, recent),
        };

        debug!(
            total_orders = stats.total_orders,
            low_stock_count = stats.low_stock_count,
            "Dashboard stats computed"
        );
        Ok(stats)
    }
}
