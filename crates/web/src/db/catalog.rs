//! Catalog repository: categories and deduplicated products.
//!
//! Both names are unique case-insensitively (`LOWER(name)` indexes), so the
//! create methods are upserts that return the existing row on conflict.

use sqlx::PgPool;

use basket_core::{CategoryId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CatalogProduct, Category, CategoryUsage};

/// Repository for `basket.category` and `basket.catalog_product`.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Find a category by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM basket.category WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Create a category, or return the existing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_category(&self, name: &str) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO basket.category (name)
            VALUES ($1)
            ON CONFLICT ((LOWER(name))) DO UPDATE SET name = basket.category.name
            RETURNING id, name
            ",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// All categories with their product counts, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<CategoryUsage>, RepositoryError> {
        let categories = sqlx::query_as::<_, CategoryUsage>(
            r"
            SELECT c.id, c.name, COUNT(p.id) AS product_count
            FROM basket.category c
            LEFT JOIN basket.catalog_product p ON p.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if another category has that name.
    pub async fn rename_category(&self, id: CategoryId, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE basket.category SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "category"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a category. Its products become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM basket.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Find a product by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_product_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CatalogProduct>, RepositoryError> {
        let product = sqlx::query_as::<_, CatalogProduct>(
            r"
            SELECT p.id, p.name, p.category_id, c.name AS category_name, p.owner_id
            FROM basket.catalog_product p
            LEFT JOIN basket.category c ON c.id = p.category_id
            WHERE LOWER(p.name) = LOWER($1)
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<CatalogProduct>, RepositoryError> {
        let product = sqlx::query_as::<_, CatalogProduct>(
            r"
            SELECT p.id, p.name, p.category_id, c.name AS category_name, p.owner_id
            FROM basket.catalog_product p
            LEFT JOIN basket.category c ON c.id = p.category_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product, or return the existing one with the same name.
    ///
    /// An existing product keeps its category and owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_product(
        &self,
        name: &str,
        category: Option<CategoryId>,
        owner: Option<UserId>,
    ) -> Result<CatalogProduct, RepositoryError> {
        let product = sqlx::query_as::<_, CatalogProduct>(
            r"
            WITH p AS (
                INSERT INTO basket.catalog_product (name, category_id, owner_id)
                VALUES ($1, $2, $3)
                ON CONFLICT ((LOWER(name))) DO UPDATE SET name = basket.catalog_product.name
                RETURNING id, name, category_id, owner_id
            )
            SELECT p.id, p.name, p.category_id, c.name AS category_name, p.owner_id
            FROM p
            LEFT JOIN basket.category c ON c.id = p.category_id
            ",
        )
        .bind(name)
        .bind(category)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Names of products visible to the given owners: global products plus
    /// those first added by any of them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_names_for(&self, owners: &[UserId]) -> Result<Vec<String>, RepositoryError> {
        let names = sqlx::query_scalar::<_, String>(
            r"
            SELECT name
            FROM basket.catalog_product
            WHERE owner_id IS NULL OR owner_id = ANY($1)
            ORDER BY name
            ",
        )
        .bind(owners)
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    /// Products with no category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn uncategorized_products(&self) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, CatalogProduct>(
            r"
            SELECT id, name, category_id, NULL::TEXT AS category_name, owner_id
            FROM basket.catalog_product
            WHERE category_id IS NULL
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// File a product under a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_product_category(
        &self,
        product: ProductId,
        category: CategoryId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE basket.catalog_product SET category_id = $2 WHERE id = $1")
            .bind(product)
            .bind(category)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Number of catalog products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_products(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM basket.catalog_product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
