//! # Dashboard Commands
//!
//! Aggregates for the dashboard cards and the recent-sales table.

use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ApiError;
use ims_core::{DailySales, DashboardStats, SaleSummary};
use ims_db::Database;

/// Hard ceiling on `list_sales`, whatever the caller asks for.
const MAX_SALES_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySalesDto {
    /// `YYYY-MM-DD`, UTC
    pub date: String,
    pub total_cents: i64,
}

impl From<DailySales> for DailySalesDto {
    fn from(day: DailySales) -> Self {
        DailySalesDto {
            date: day.date.format("%Y-%m-%d").to_string(),
            total_cents: day.total_cents,
        }
    }
}

/// Dashboard figures, all money in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStatsDto {
    pub total_value_cents: i64,
    pub total_profit_cents: i64,
    pub potential_profit_cents: i64,
    pub low_stock_count: i64,
    pub total_orders: i64,
    /// Seven days, oldest first, ending today
    pub sales_trend: Vec<DailySalesDto>,
}

impl From<DashboardStats> for DashboardStatsDto {
    fn from(stats: DashboardStats) -> Self {
        DashboardStatsDto {
            total_value_cents: stats.total_value_cents,
            total_profit_cents: stats.total_profit_cents,
            potential_profit_cents: stats.potential_profit_cents,
            low_stock_count: stats.low_stock_count,
            total_orders: stats.total_orders,
            sales_trend: stats.sales_trend.into_iter().map(DailySalesDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleSummaryDto {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub sold_at: String,
}

impl From<SaleSummary> for SaleSummaryDto {
    fn from(s: SaleSummary) -> Self {
        SaleSummaryDto {
            id: s.id,
            product_id: s.product_id,
            product_name: s.product_name,
            sku: s.sku,
            quantity: s.quantity,
            unit_price_cents: s.unit_price_cents,
            total_cents: s.total_cents,
            sold_at: s.sold_at.to_rfc3339(),
        }
    }
}

/// Dashboard aggregates, read from one consistent snapshot.
pub async fn dashboard_stats(db: &Database) -> Result<DashboardStatsDto, ApiError> {
    debug!("dashboard_stats command");
    let stats = db.stats().dashboard().await?;
    Ok(DashboardStatsDto::from(stats))
}

/// Most recent sales, newest first.
///
/// ## Arguments
/// * `limit` - Row cap; defaults to `config.recent_sales_limit`, at most 1000
pub async fn list_sales(
    db: &Database,
    config: &AppConfig,
    limit: Option<u32>,
) -> Result<Vec<SaleSummaryDto>, ApiError> {
    let limit = limit
        .unwrap_or(config.recent_sales_limit)
        .clamp(1, MAX_SALES_LIMIT);

    debug!(limit, "list_sales command");

    let sales = db.sales().list_recent(limit).await?;
    Ok(sales.into_iter().map(SaleSummaryDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ims_core::NewProduct;
    use ims_db::DbConfig;

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                name: "Widget".to_string(),
                sku: "WID-001".to_string(),
                category_id: 1,
                price_cents: 1000,
                purchasing_price_cents: 600,
                stock_quantity: 20,
                min_stock_level: Some(5),
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let (db, id) = setup().await;
        db.ledger().record_sale(id, 5).await.unwrap();
        db.ledger().restock(id, 10, Some("supplier")).await.unwrap();

        let stats = dashboard_stats(&db).await.unwrap();
        assert_eq!(stats.total_value_cents, 25_000);
        assert_eq!(stats.total_profit_cents, 2_000);
        assert_eq!(stats.potential_profit_cents, 10_000);
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.sales_trend.len(), 7);

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(stats.sales_trend[6].date, today);
        assert_eq!(stats.sales_trend[6].total_cents, 5000);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["sales_trend"][6]["date"], today.as_str());
    }

    #[tokio::test]
    async fn test_list_sales_limit() {
        let (db, id) = setup().await;
        for _ in 0..3 {
            db.ledger().record_sale(id, 1).await.unwrap();
        }

        let config = AppConfig {
            recent_sales_limit: 2,
            ..AppConfig::default()
        };

        let sales = list_sales(&db, &config, None).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].sku, "WID-001");
        assert!(sales[0].id > sales[1].id);

        let sales = list_sales(&db, &config, Some(10)).await.unwrap();
        assert_eq!(sales.len(), 3);

        // Zero is clamped up rather than returning nothing
        let sales = list_sales(&db, &config, Some(0)).await.unwrap();
        assert_eq!(sales.len(), 1);
    }
}
