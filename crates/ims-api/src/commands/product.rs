//! # Product Commands
//!
//! Catalogue listing, lookup, creation and editing.
//!
//! ## List Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product List Flow                                    │
//! │                                                                         │
//! │  GET /api/products?search=mouse&low_stock_only=true                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  list_products(&db, ListProductsQuery { .. })                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search trimmed, capped at 100 chars, case-folded match on name/sku    │
//! │  low_stock_only → stock_quantity <= min_stock_level                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ProductDto> ordered by name, each with a stock_status             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{ApiError, ErrorCode};
use ims_core::{NewProduct, Product, ProductFilter, ProductPatch, StockStatus};
use ims_db::Database;

/// Product DTO for the frontend.
///
/// Prices are in cents; `stock_status` is precomputed so the UI does not
/// repeat the low-stock rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category_id: i64,
    pub category_name: String,
    pub price_cents: i64,
    pub purchasing_price_cents: i64,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub stock_status: StockStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let stock_status = p.stock_status();
        ProductDto {
            id: p.id,
            name: p.name,
            sku: p.sku,
            category_id: p.category_id,
            category_name: p.category_name,
            price_cents: p.price_cents,
            purchasing_price_cents: p.purchasing_price_cents,
            stock_quantity: p.stock_quantity,
            min_stock_level: p.min_stock_level,
            stock_status,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Query string of the product list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub low_stock_only: Option<bool>,
}

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub category_id: i64,
    pub price_cents: i64,
    #[serde(default)]
    pub purchasing_price_cents: i64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name,
            sku: req.sku,
            category_id: req.category_id,
            price_cents: req.price_cents,
            purchasing_price_cents: req.purchasing_price_cents,
            stock_quantity: req.stock_quantity,
            min_stock_level: req.min_stock_level,
        }
    }
}

/// Body of an update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub purchasing_price_cents: Option<i64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            name: req.name,
            sku: req.sku,
            category_id: req.category_id,
            price_cents: req.price_cents,
            purchasing_price_cents: req.purchasing_price_cents,
            stock_quantity: req.stock_quantity,
            min_stock_level: req.min_stock_level,
        }
    }
}

/// A created or updated product as stored, with a confirmation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: ProductDto,
}

impl ProductResponse {
    fn new(message: impl Into<String>, product: Product) -> Self {
        ProductResponse {
            message: message.into(),
            product: ProductDto::from(product),
        }
    }
}

/// Lists products ordered by name.
///
/// ## Arguments
/// * `query.search` - Case-insensitive substring of name or SKU
/// * `query.low_stock_only` - Only products at or under their minimum level
///
/// ## Errors
/// `VALIDATION_FAILED` when the search text is longer than 100 characters.
pub async fn list_products(
    db: &Database,
    query: ListProductsQuery,
) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    debug!(search = ?query.search, low_stock_only = ?query.low_stock_only, "list_products command");

    let filter = ProductFilter {
        search: query.search,
        low_stock_only: query.low_stock_only.unwrap_or(false),
    };

    let dtos: Vec<ProductDto> = db
        .products()
        .list(&filter)
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        "list_products complete"
    );
    Ok(dtos)
}

/// Gets a single product.
///
/// ## Errors
/// `PRODUCT_NOT_FOUND` when no product has this id.
pub async fn get_product(db: &Database, id: i64) -> Result<ProductDto, ApiError> {
    debug!(id, "get_product command");
    let product = db.products().get_by_id(id).await?;
    Ok(ProductDto::from(product))
}

/// Gets a single product by SKU.
pub async fn get_product_by_sku(db: &Database, sku: String) -> Result<ProductDto, ApiError> {
    debug!(sku = %sku, "get_product_by_sku command");
    let product = db
        .products()
        .get_by_sku(&sku)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, format!("SKU not found: {}", sku.trim())))?;
    Ok(ProductDto::from(product))
}

/// Creates a product.
///
/// ## Errors
/// * `VALIDATION_FAILED` - Bad field, unknown category, or price ≤ purchasing price
/// * `DUPLICATE_SKU` - SKU already in use
pub async fn create_product(
    db: &Database,
    request: CreateProductRequest,
) -> Result<ProductResponse, ApiError> {
    debug!(sku = %request.sku, "create_product command");

    let product = db.products().create(&NewProduct::from(request)).await?;

    info!(id = product.id, sku = %product.sku, "Product created");
    Ok(ProductResponse::new("Product created successfully", product))
}

/// Applies a partial update to a product.
///
/// ## Errors
/// * `PRODUCT_NOT_FOUND` - No product with this id
/// * `VALIDATION_FAILED` - Empty request, bad field, or merged margin not positive
/// * `DUPLICATE_SKU` - New SKU belongs to another product
pub async fn update_product(
    db: &Database,
    id: i64,
    request: UpdateProductRequest,
) -> Result<ProductResponse, ApiError> {
    debug!(id, "update_product command");

    let product = db.products().update(id, &ProductPatch::from(request)).await?;

    info!(id, stock = product.stock_quantity, "Product updated");
    Ok(ProductResponse::new("Product updated successfully", product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_db::DbConfig;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn keyboard() -> CreateProductRequest {
        CreateProductRequest {
            name: "Mechanical Keyboard".to_string(),
            sku: "KB-001".to_string(),
            category_id: 1,
            price_cents: 12999,
            purchasing_price_cents: 8000,
            stock_quantity: 3,
            min_stock_level: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let db = setup().await;

        let created = create_product(&db, keyboard()).await.unwrap();
        assert_eq!(created.message, "Product created successfully");
        assert!(created.product.id > 0);
        assert_eq!(created.product.sku, "KB-001");
        assert_eq!(created.product.category_name, "Electronics");
        assert_eq!(created.product.stock_quantity, 3);
        assert_eq!(created.product.stock_status, StockStatus::LowStock);

        let dto = get_product(&db, created.product.id).await.unwrap();
        assert_eq!(dto, created.product);
        assert_eq!(dto.min_stock_level, 5);

        let by_sku = get_product_by_sku(&db, " KB-001 ".to_string()).await.unwrap();
        assert_eq!(by_sku.id, created.product.id);

        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["product"]["sku"], "KB-001");
        assert_eq!(json["product"]["stock_status"], "low_stock");
    }

    #[tokio::test]
    async fn test_create_errors() {
        let db = setup().await;
        create_product(&db, keyboard()).await.unwrap();

        let err = create_product(&db, keyboard()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateSku);
        assert_eq!(err.http_status(), 409);

        let mut no_margin = keyboard();
        no_margin.sku = "KB-002".to_string();
        no_margin.purchasing_price_cents = no_margin.price_cents;
        let err = create_product(&db, no_margin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.field.as_deref(), Some("price"));

        let mut bad_category = keyboard();
        bad_category.sku = "KB-003".to_string();
        bad_category.category_id = 999;
        let err = create_product(&db, bad_category).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.field.as_deref(), Some("category_id"));

        let mut overpriced = keyboard();
        overpriced.sku = "KB-004".to_string();
        overpriced.price_cents = ims_core::validation::MAX_PRICE_CENTS + 1;
        let err = create_product(&db, overpriced).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.field.as_deref(), Some("price"));
    }

    #[tokio::test]
    async fn test_update_and_list() {
        let db = setup().await;
        let id = create_product(&db, keyboard()).await.unwrap().product.id;

        let response = update_product(
            &db,
            id,
            UpdateProductRequest {
                stock_quantity: Some(40),
                price_cents: Some(13999),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(response.message, "Product updated successfully");
        assert_eq!(response.product.id, id);
        assert_eq!(response.product.stock_quantity, 40);
        assert_eq!(response.product.price_cents, 13999);
        assert_eq!(response.product.name, "Mechanical Keyboard");
        assert_eq!(response.product.stock_status, StockStatus::InStock);
        assert_eq!(get_product(&db, id).await.unwrap(), response.product);

        let all = list_products(&db, ListProductsQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].stock_status, StockStatus::InStock);

        let low = list_products(
            &db,
            ListProductsQuery {
                search: Some("keyboard".to_string()),
                low_stock_only: Some(true),
            },
        )
        .await
        .unwrap();
        assert!(low.is_empty());
    }

    #[tokio::test]
    async fn test_update_errors() {
        let db = setup().await;
        let id = create_product(&db, keyboard()).await.unwrap().product.id;

        let ghost = UpdateProductRequest {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        let err = update_product(&db, 999, ghost).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);

        let err = update_product(&db, id, UpdateProductRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = get_product(&db, 999).await.unwrap_err();
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateProductRequest = serde_json::from_str(
            r#"{"name":"Mug","sku":"MUG-1","category_id":2,"price_cents":500}"#,
        )
        .unwrap();
        assert_eq!(req.purchasing_price_cents, 0);
        assert_eq!(req.stock_quantity, 0);
        assert_eq!(req.min_stock_level, None);
    }
}
