//! Price history repository.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use basket_core::{Money, ProductId, ShoppingListId, UserId};

use super::RepositoryError;
use crate::models::PriceEntry;

/// Repository for `basket.price_history`.
pub struct PriceHistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceHistoryRepository<'a> {
    /// Create a new price history repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Prices paid for a product by any of `owners`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_product(
        &self,
        product: ProductId,
        owners: &[UserId],
    ) -> Result<Vec<PriceEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, PriceEntry>(
            r"
            SELECT ph.id, ph.product_id, ph.price, ph.purchased_on, ph.list_id,
                   u.email AS user_email
            FROM basket.price_history ph
            JOIN basket.user u ON u.id = ph.user_id
            WHERE ph.product_id = $1 AND ph.user_id = ANY($2)
            ORDER BY ph.purchased_on DESC, ph.id DESC
            ",
        )
        .bind(product)
        .bind(owners)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Most recent price paid by any of `owners` for each of `products`.
    ///
    /// Products never bought are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_prices(
        &self,
        products: &[ProductId],
        owners: &[UserId],
    ) -> Result<HashMap<ProductId, Money>, RepositoryError> {
        if products.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (ProductId, Money)>(
            r"
            SELECT DISTINCT ON (product_id) product_id, price
            FROM basket.price_history
            WHERE product_id = ANY($1) AND user_id = ANY($2)
            ORDER BY product_id, purchased_on DESC, id DESC
            ",
        )
        .bind(products)
        .bind(owners)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Number of recorded prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM basket.price_history")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Copy the unit price of every priced item on `list` into the history.
///
/// Returns the number of prices recorded.
pub(crate) async fn record_for_list(
    conn: &mut PgConnection,
    list: ShoppingListId,
    user: UserId,
    purchased_on: NaiveDate,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        INSERT INTO basket.price_history (product_id, user_id, list_id, price, purchased_on)
        SELECT product_id, $2, list_id, unit_price, $3
        FROM basket.shopping_list_item
        WHERE list_id = $1 AND unit_price IS NOT NULL
        ",
    )
    .bind(list)
    .bind(user)
    .bind(purchased_on)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
