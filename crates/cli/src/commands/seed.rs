//! Seed reference data.

use basket_core::category::DEFAULT_CATEGORIES;
use basket_web::services::CatalogService;

use super::{CommandError, connect};

/// Create the default grocery categories. Existing ones are left alone.
///
/// # Errors
///
/// Returns `CommandError` if a query fails.
pub async fn categories() -> Result<usize, CommandError> {
    let pool = connect().await?;
    let catalog = CatalogService::new(pool);

    for name in DEFAULT_CATEGORIES {
        let category = catalog.upsert_category(name).await?;
        tracing::debug!(category_id = %category.id, name = %category.name, "Category ready");
    }

    tracing::info!(count = DEFAULT_CATEGORIES.len(), "Default categories seeded");
    Ok(DEFAULT_CATEGORIES.len())
}
