//! End-to-end ledger scenarios against a real SQLite database.

use ims_core::{CoreError, NewProduct, ProductFilter};
use ims_db::{Database, DbConfig, DbError};

async fn setup() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn widget(stock: i64) -> NewProduct {
    NewProduct {
        name: "Widget".to_string(),
        sku: "WID-001".to_string(),
        category_id: 1,
        price_cents: 1000,
        purchasing_price_cents: 600,
        stock_quantity: stock,
        min_stock_level: Some(5),
    }
}

#[tokio::test]
async fn sale_restock_dashboard_walkthrough() {
    let db = setup().await;
    let product = db.products().create(&widget(20)).await.unwrap();

    // Sell 5 of 20
    let receipt = db.ledger().record_sale(product.id, 5).await.unwrap();
    assert_eq!(receipt.remaining_stock, 15);
    assert_eq!(receipt.sale.quantity, 5);
    assert_eq!(receipt.sale.total_cents, 5000);

    // Restock 10 from the supplier
    let restock = db
        .ledger()
        .restock(product.id, 10, Some("supplier"))
        .await
        .unwrap();
    assert_eq!(restock.new_stock, 25);
    assert_eq!(restock.log.delta, 10);
    assert_eq!(restock.log.reason, "supplier");

    let stats = db.stats().dashboard().await.unwrap();
    assert_eq!(stats.total_value_cents, 25_000);
    assert_eq!(stats.total_profit_cents, 2_000);
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.low_stock_count, 0);
    assert_eq!(stats.sales_trend.len(), 7);
    assert_eq!(stats.sales_trend[6].total_cents, 5000);

    // Every unit on hand is accounted for by the ledger
    let logs = db.stock_logs().list_for_product(product.id).await.unwrap();
    let deltas: Vec<i64> = logs.iter().map(|l| l.delta).collect();
    assert_eq!(deltas, [10, -5, 20]);
    assert_eq!(db.stock_logs().net_delta(product.id).await.unwrap(), 25);
}

#[tokio::test]
async fn failed_operations_leave_no_trace() {
    let db = setup().await;
    let product = db.products().create(&widget(3)).await.unwrap();

    let err = db.ledger().record_sale(999, 1).await.unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(999))));

    let err = db.ledger().record_sale(product.id, 4).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Domain(CoreError::InsufficientStock {
            available: 3,
            requested: 4,
            ..
        })
    ));

    assert_eq!(db.sales().count().await.unwrap(), 0);
    assert_eq!(db.stock_logs().list_for_product(product.id).await.unwrap().len(), 1);
    assert_eq!(
        db.products().get_by_id(product.id).await.unwrap().stock_quantity,
        3
    );
}

#[tokio::test]
async fn low_stock_listing_follows_sales() {
    let db = setup().await;
    let product = db.products().create(&widget(8)).await.unwrap();

    let low_only = ProductFilter {
        search: None,
        low_stock_only: true,
    };
    assert!(db.products().list(&low_only).await.unwrap().is_empty());

    db.ledger().record_sale(product.id, 3).await.unwrap();

    let low = db.products().list(&low_only).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].stock_quantity, 5);
    assert_eq!(db.stats().dashboard().await.unwrap().low_stock_count, 1);
}
