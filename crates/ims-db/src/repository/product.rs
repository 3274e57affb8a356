//! # Product Repository
//!
//! Catalogue reads plus the two product-level ledger writes: create and
//! update.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create / update                                      │
//! │                                                                         │
//! │  NewProduct / ProductPatch                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate()  ← pure, ims-core, no store access                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  ├── first statement writes (takes the SQLite write lock)              │
//! │  ├── UNIQUE(sku) failure      → DuplicateSku                           │
//! │  ├── FOREIGN KEY(category_id) → ValidationFailed(category_id)          │
//! │  ├── stock changed?           → append stock_logs row                  │
//! │  COMMIT                       (any early return rolls back on drop)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::stock_log;
use ims_core::validation::validate_search_query;
use ims_core::{
    CoreError, NewProduct, Product, ProductFilter, ProductPatch, ValidationError,
    DEFAULT_MIN_STOCK_LEVEL, INITIAL_STOCK_REASON, STOCK_ADJUSTMENT_REASON,
    STOCK_REDUCTION_REASON,
};

/// Product columns joined with the category name.
pub(crate) const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.sku,
        p.category_id,
        c.name AS category_name,
        p.price_cents,
        p.purchasing_price_cents,
        p.stock_quantity,
        p.min_stock_level,
        p.created_at,
        p.updated_at
    FROM products p
    INNER JOIN categories c ON c.id = p.category_id
"#;

/// Reads one product on an open connection or transaction.
pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    id: i64,
) -> DbResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?1");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(product)
}

/// Escapes `%`, `_` and `\` so user text matches literally in LIKE.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Maps constraint failures on `products` to the domain errors callers see.
fn classify_write_error(err: sqlx::Error, sku: &str, category_id: i64) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } if field.contains("sku") => {
            CoreError::DuplicateSku {
                sku: sku.to_string(),
            }
            .into()
        }
        // category_id is the only foreign key on products
        DbError::ForeignKeyViolation { .. } => {
            ValidationError::UnknownCategory { category_id }.into()
        }
        other => other,
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let low = repo.list(&ProductFilter { low_stock_only: true, ..Default::default() }).await?;
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by name.
    ///
    /// ## Filters
    /// - `search`: case-insensitive substring of name or SKU, trimmed,
    ///   at most 100 characters; blank means no filter. Non-ASCII text is
    ///   folded with Unicode lowercase rules in Rust.
    /// - `low_stock_only`: `stock_quantity <= min_stock_level`
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let search = match filter.search.as_deref() {
            Some(raw) => validate_search_query(raw)?,
            None => None,
        };

        // LIKE folds ASCII only; other text is matched after the fetch
        let (pattern, folded) = match search.as_deref() {
            Some(q) if q.is_ascii() => (Some(like_pattern(q)), None),
            Some(q) => (None, Some(q.to_lowercase())),
            None => (None, None),
        };

        debug!(search = ?search, low_stock_only = filter.low_stock_only, "Listing products");

        let sql = format!(
            r#"{PRODUCT_SELECT}
            WHERE (?1 IS NULL OR p.name LIKE ?1 ESCAPE '\' OR p.sku LIKE ?1 ESCAPE '\')
              AND (?2 = 0 OR p.stock_quantity <= p.min_stock_level)
            ORDER BY p.name, p.id
            "#
        );

        let mut products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(filter.low_stock_only)
            .fetch_all(&self.pool)
            .await?;

        if let Some(needle) = folded {
            products.retain(|p| {
                p.name.to_lowercase().contains(&needle) || p.sku.to_lowercase().contains(&needle)
            });
        }

        debug!(count = products.len(), "Product list returned");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(Domain(ProductNotFound))` - No such id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Gets a product by its ID, `None` when absent.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Gets a product by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.sku = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Creates a product.
    ///
    /// Field rules and the margin rule are checked before the store is
    /// touched. Inside the transaction the insert itself enforces SKU
    /// uniqueness and the category reference. Initial stock is recorded as
    /// an "Initial stock" ledger row.
    pub async fn create(&self, new: &NewProduct) -> DbResult<Product> {
        let new = new.validate()?;
        let min_stock_level = new.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL);
        let now = Utc::now();

        debug!(sku = %new.sku, category_id = new.category_id, "Creating product");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (
                name, sku, category_id,
                price_cents, purchasing_price_cents,
                stock_quantity, min_stock_level,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.sku)
        .bind(new.category_id)
        .bind(new.price_cents)
        .bind(new.purchasing_price_cents)
        .bind(new.stock_quantity)
        .bind(min_stock_level)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, &new.sku, new.category_id))
        .inspect_err(|e| warn!(sku = %new.sku, error = %e, "Product create rejected"))?;

        if new.stock_quantity > 0 {
            stock_log::append(&mut tx, id, new.stock_quantity, INITIAL_STOCK_REASON, now).await?;
        }

        let product = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(id, sku = %product.sku, stock = product.stock_quantity, "Product created");
        Ok(product)
    }

    /// Applies a partial update.
    ///
    /// ## Steps
    /// 1. Validate supplied fields (empty patch → `NothingToUpdate`)
    /// 2. Touch the row to take the write lock; 0 rows → `ProductNotFound`
    /// 3. Merge over the stored row and re-check price > purchasing_price
    /// 4. Write; UNIQUE/FK failures map to `DuplicateSku` / unknown category
    /// 5. Log `new − old` stock as an adjustment or reduction
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> DbResult<Product> {
        patch.validate()?;
        let now = Utc::now();

        debug!(id, "Updating product");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let touched = sqlx::query("UPDATE products SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if touched == 0 {
            warn!(id, "Update of unknown product");
            return Err(CoreError::ProductNotFound(id).into());
        }

        let current = fetch_product(&mut tx, id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;
        let merged = patch.apply(&current)?;

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                sku = ?3,
                category_id = ?4,
                price_cents = ?5,
                purchasing_price_cents = ?6,
                stock_quantity = ?7,
                min_stock_level = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&merged.name)
        .bind(&merged.sku)
        .bind(merged.category_id)
        .bind(merged.price_cents)
        .bind(merged.purchasing_price_cents)
        .bind(merged.stock_quantity)
        .bind(merged.min_stock_level)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify_write_error(e, &merged.sku, merged.category_id))
        .inspect_err(|e| warn!(id, error = %e, "Product update rejected"))?;

        let delta = merged.stock_quantity - current.stock_quantity;
        if delta != 0 {
            let reason = if delta > 0 {
                STOCK_ADJUSTMENT_REASON
            } else {
                STOCK_REDUCTION_REASON
            };
            stock_log::append(&mut tx, id, delta, reason, now).await?;
        }

        let product = fetch_product(&mut tx, id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(id, sku = %product.sku, stock_delta = delta, "Product updated");
        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
