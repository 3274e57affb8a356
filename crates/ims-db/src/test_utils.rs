//! Shared test utilities for ims-db.
//!
//! Helpers for setting up test databases and building product input with
//! sensible defaults.

use crate::{Database, DbConfig};
use ims_core::NewProduct;
use tempfile::TempDir;

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ims_db=debug,sqlx=warn")
        .with_test_writer()
        .try_init();
}

/// Creates a migrated in-memory database. Every call is isolated.
pub async fn setup_db() -> Database {
    init_test_tracing();
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Creates a migrated file-backed database with a multi-connection pool,
/// for tests where writers must really race. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn setup_file_db() -> (Database, TempDir) {
    init_test_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let config = DbConfig::new(dir.path().join("inventory.db")).max_connections(5);
    let db = Database::new(config).await.expect("file database");
    (db, dir)
}

/// Product input in category 1 (Electronics) with the default min level.
///
/// # Defaults
/// * name: "Product {sku}"
/// * min_stock_level: None (5)
pub fn new_product(sku: &str, price_cents: i64, purchasing_price_cents: i64, stock: i64) -> NewProduct {
    NewProduct {
        name: format!("Product {sku}"),
        sku: sku.to_string(),
        category_id: 1,
        price_cents,
        purchasing_price_cents,
        stock_quantity: stock,
        min_stock_level: None,
    }
}
