//! Catalog service: product and category upserts, classification and
//! autocomplete suggestions.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use basket_core::UserId;
use basket_core::category::classify;

use super::ServiceError;
use crate::db::CatalogRepository;
use crate::models::{CatalogProduct, Category};

/// Longest accepted product or category name, in characters.
pub const MAX_NAME_LENGTH: usize = 120;

/// Most suggestions returned for one prefix.
pub const MAX_SUGGESTIONS: usize = 10;

const NAMES_TTL: Duration = Duration::from_secs(300);
const NAMES_CAPACITY: u64 = 1_000;

/// Outcome of an admin reclassification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReclassifyReport {
    /// Products that had no category.
    pub examined: usize,
    /// Products the classifier filed under a category.
    pub classified: usize,
}

/// Catalog operations plus the per-user product name cache.
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    names: Cache<UserId, Arc<[String]>>,
}

impl CatalogService {
    /// Create a catalog service with an empty name cache.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let names = Cache::builder()
            .max_capacity(NAMES_CAPACITY)
            .time_to_live(NAMES_TTL)
            .build();
        Self { pool, names }
    }

    /// Find a category by name, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` for an empty or overlong name.
    #[instrument(skip(self))]
    pub async fn upsert_category(&self, name: &str) -> Result<Category, ServiceError> {
        let name = normalize_name(name)?;
        let repo = CatalogRepository::new(&self.pool);

        if let Some(category) = repo.find_category_by_name(&name).await? {
            return Ok(category);
        }
        Ok(repo.create_category(&name).await?)
    }

    /// Find a product by name, creating it if missing.
    ///
    /// A new product is filed under `category_hint` when given, otherwise
    /// under whatever the classifier picks.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` for an empty or overlong name.
    #[instrument(skip(self))]
    pub async fn upsert_product(
        &self,
        owner: UserId,
        name: &str,
        category_hint: Option<&str>,
    ) -> Result<CatalogProduct, ServiceError> {
        let name = normalize_name(name)?;
        let repo = CatalogRepository::new(&self.pool);

        if let Some(product) = repo.find_product_by_name(&name).await? {
            return Ok(product);
        }

        let category_name = category_hint
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| classify(&name));
        let category = match category_name {
            Some(c) => Some(self.upsert_category(c).await?.id),
            None => None,
        };

        let product = repo.create_product(&name, category, Some(owner)).await?;
        debug!(product_id = %product.id, "Catalog product created");
        self.names.invalidate_all();
        Ok(product)
    }

    /// Product names starting with `prefix` that `user` can see.
    ///
    /// `owners` is the user's accessible set; global products are always
    /// visible.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the names cannot be loaded.
    pub async fn suggest(
        &self,
        user: UserId,
        owners: &[UserId],
        prefix: &str,
    ) -> Result<Vec<String>, ServiceError> {
        if prefix.trim().is_empty() {
            return Ok(Vec::new());
        }

        let names = if let Some(names) = self.names.get(&user).await {
            names
        } else {
            let names: Arc<[String]> = CatalogRepository::new(&self.pool)
                .product_names_for(owners)
                .await?
                .into();
            self.names.insert(user, Arc::clone(&names)).await;
            names
        };

        Ok(filter_suggestions(&names, prefix))
    }

    /// Forget the cached names for `user`, whose accessible set changed.
    pub async fn invalidate_user(&self, user: UserId) {
        self.names.invalidate(&user).await;
    }

    /// Run the classifier over every uncategorized product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn reclassify_uncategorized(&self) -> Result<ReclassifyReport, ServiceError> {
        let repo = CatalogRepository::new(&self.pool);
        let products = repo.uncategorized_products().await?;

        let mut report = ReclassifyReport {
            examined: products.len(),
            classified: 0,
        };
        for product in &products {
            if let Some(name) = classify(&product.name) {
                let category = self.upsert_category(name).await?;
                repo.set_product_category(product.id, category.id).await?;
                report.classified += 1;
            }
        }

        info!(
            examined = report.examined,
            classified = report.classified,
            "Reclassified uncategorized products"
        );
        Ok(report)
    }
}

/// Collapse whitespace and check length.
///
/// # Errors
///
/// Returns `ServiceError::Invalid` if the name is empty or too long.
pub fn normalize_name(name: &str) -> Result<String, ServiceError> {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(ServiceError::Invalid("name cannot be empty".to_owned()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ServiceError::Invalid(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name)
}

/// Case-insensitive prefix filter, capped at [`MAX_SUGGESTIONS`].
fn filter_suggestions(names: &[String], prefix: &str) -> Vec<String> {
    let prefix = prefix.trim().to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  whole   milk ").unwrap(), "whole milk");
        assert!(normalize_name(" \t ").is_err());
        assert!(normalize_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_suggestions_match_prefix_ignoring_case() {
        let all = names(&["Bananas", "Basil", "Bread", "baking soda", "Oat milk"]);
        assert_eq!(
            filter_suggestions(&all, "BA"),
            ["Bananas", "Basil", "baking soda"]
        );
        assert_eq!(filter_suggestions(&all, " oat"), ["Oat milk"]);
        assert!(filter_suggestions(&all, "milk").is_empty());
    }

    #[test]
    fn test_suggestions_are_capped() {
        let all: Vec<String> = (0..25).map(|i| format!("Item {i:02}")).collect();
        assert_eq!(filter_suggestions(&all, "item").len(), MAX_SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_invalidate_user_drops_only_that_users_names() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://basket@127.0.0.1:1/basket")
            .unwrap();
        let catalog = CatalogService::new(pool);
        let alice = UserId::new(1);
        let bob = UserId::new(2);
        let shared: Arc<[String]> = names(&["Zucchini bread"]).into();
        catalog.names.insert(alice, Arc::clone(&shared)).await;
        catalog.names.insert(bob, shared).await;

        catalog.invalidate_user(bob).await;

        assert!(catalog.names.get(&bob).await.is_none());
        assert!(catalog.names.get(&alice).await.is_some());
    }
}
