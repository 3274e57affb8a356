//! # Category Repository
//!
//! Categories are seeded by migration `002_default_categories.sql`; the
//! application only reads them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use ims_core::Category;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        debug!("Listing categories");

        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }
}
