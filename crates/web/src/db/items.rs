//! Shopping list item repository.
//!
//! Item rows store their own `total` (`quantity × unit_price`, rounded to
//! cents). Callers recompute the list total after every mutation.

use sqlx::{PgConnection, PgPool};

use basket_core::{ItemId, Money, ProductId, Quantity, ShoppingListId, line_total};

use super::RepositoryError;
use crate::models::ListItem;

/// Repository for `basket.shopping_list_item`.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Items on a list with product and category names, grouped by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_list(&self, list: ShoppingListId) -> Result<Vec<ListItem>, RepositoryError> {
        let items = sqlx::query_as::<_, ListItem>(
            r"
            SELECT i.id, i.list_id, i.product_id, p.name AS product_name,
                   p.category_id, c.name AS category_name,
                   i.quantity, i.unit_price, i.total, i.checked
            FROM basket.shopping_list_item i
            JOIN basket.catalog_product p ON p.id = i.product_id
            LEFT JOIN basket.category c ON c.id = p.category_id
            WHERE i.list_id = $1
            ORDER BY c.name NULLS LAST, p.name, i.id
            ",
        )
        .bind(list)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Get an item, scoped to its list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        list: ShoppingListId,
        id: ItemId,
    ) -> Result<Option<ListItem>, RepositoryError> {
        let item = sqlx::query_as::<_, ListItem>(
            r"
            SELECT i.id, i.list_id, i.product_id, p.name AS product_name,
                   p.category_id, c.name AS category_name,
                   i.quantity, i.unit_price, i.total, i.checked
            FROM basket.shopping_list_item i
            JOIN basket.catalog_product p ON p.id = i.product_id
            LEFT JOIN basket.category c ON c.id = p.category_id
            WHERE i.list_id = $1 AND i.id = $2
            ",
        )
        .bind(list)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// The item for `product` on `list`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_product(
        &self,
        list: ShoppingListId,
        product: ProductId,
    ) -> Result<Option<ItemId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, ItemId>(
            r"
            SELECT id FROM basket.shopping_list_item
            WHERE list_id = $1 AND product_id = $2
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(list)
        .bind(product)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// Add an item to a list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        list: ShoppingListId,
        product: ProductId,
        quantity: Quantity,
        unit_price: Option<Money>,
    ) -> Result<ItemId, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, list, product, quantity, unit_price, false).await
    }

    /// Overwrite an item's quantity, price and checked flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item is not on the list.
    pub async fn update(
        &self,
        list: ShoppingListId,
        id: ItemId,
        quantity: Quantity,
        unit_price: Option<Money>,
        checked: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE basket.shopping_list_item
            SET quantity = $3, unit_price = $4, total = $5, checked = $6, updated_at = NOW()
            WHERE list_id = $1 AND id = $2
            ",
        )
        .bind(list)
        .bind(id)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_total(quantity, unit_price)?)
        .bind(checked)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove an item from a list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item is not on the list.
    pub async fn delete(&self, list: ShoppingListId, id: ItemId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM basket.shopping_list_item WHERE list_id = $1 AND id = $2")
                .bind(list)
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Connection-level helpers shared with transactional list operations
// =============================================================================

/// Insert an item row, computing its total.
pub(crate) async fn insert(
    conn: &mut PgConnection,
    list: ShoppingListId,
    product: ProductId,
    quantity: Quantity,
    unit_price: Option<Money>,
    checked: bool,
) -> Result<ItemId, RepositoryError> {
    let id = sqlx::query_scalar::<_, ItemId>(
        r"
        INSERT INTO basket.shopping_list_item (list_id, product_id, quantity, unit_price, total, checked)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        ",
    )
    .bind(list)
    .bind(product)
    .bind(quantity)
    .bind(unit_price)
    .bind(line_total(quantity, unit_price)?)
    .bind(checked)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Move every item without a unit price from one list to another.
///
/// Moved items are unchecked. Returns the number moved.
pub(crate) async fn move_unpriced(
    conn: &mut PgConnection,
    from: ShoppingListId,
    to: ShoppingListId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE basket.shopping_list_item
        SET list_id = $2, checked = FALSE, updated_at = NOW()
        WHERE list_id = $1 AND unit_price IS NULL
        ",
    )
    .bind(from)
    .bind(to)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Write `SUM(item.total)` back to the list and return it.
pub(crate) async fn recompute_total(
    conn: &mut PgConnection,
    list: ShoppingListId,
) -> Result<Money, RepositoryError> {
    let total = sqlx::query_scalar::<_, Money>(
        r"
        UPDATE basket.shopping_list
        SET total = COALESCE(
                (SELECT SUM(total) FROM basket.shopping_list_item WHERE list_id = $1), 0),
            updated_at = NOW()
        WHERE id = $1
        RETURNING total
        ",
    )
    .bind(list)
    .fetch_optional(conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(total)
}
