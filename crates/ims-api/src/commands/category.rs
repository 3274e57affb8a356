//! Category lookup for the product form dropdown.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use ims_core::Category;
use ims_db::Database;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id,
            name: c.name,
        }
    }
}

/// All categories ordered by name.
pub async fn list_categories(db: &Database) -> Result<Vec<CategoryDto>, ApiError> {
    debug!("list_categories command");
    let categories = db.categories().list().await?;
    Ok(categories.into_iter().map(CategoryDto::from).collect())
}
