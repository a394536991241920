//! Catalog types: categories and deduplicated product names.

use basket_core::{CategoryId, ProductId, UserId};

/// A grocery category.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A catalog product joined with its category name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    /// User who first added the product, `None` for global entries.
    pub owner_id: Option<UserId>,
}

/// A category with the number of products filed under it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryUsage {
    pub id: CategoryId,
    pub name: String,
    pub product_count: i64,
}
