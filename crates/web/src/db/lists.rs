//! Shopping list repository.
//!
//! Multi-step operations (`finish`, `import_completed`) run in a single
//! transaction and use the connection-level helpers from the items and
//! prices modules.

use chrono::NaiveDate;
use sqlx::PgPool;

use basket_core::{ListStatus, Money, ProductId, Quantity, ShoppingListId, UserId};

use super::{RepositoryError, items, prices};
use crate::models::{HistoryEntry, ShoppingList};

/// Result of completing a list.
#[derive(Debug, Clone, Copy)]
pub struct FinishedList {
    /// Final total of the completed list.
    pub total: Money,
    /// The fresh OPEN list the owner continues with.
    pub next_list: ShoppingListId,
    /// Prices copied into the history.
    pub archived_prices: u64,
    /// Unpriced items carried over to `next_list`.
    pub moved_items: u64,
}

/// One line of an imported list, product already resolved.
#[derive(Debug, Clone, Copy)]
pub struct ImportedItem {
    pub product: ProductId,
    pub quantity: Quantity,
    pub unit_price: Option<Money>,
}

/// Repository for `basket.shopping_list`.
pub struct ListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ListRepository<'a> {
    /// Create a new list repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The owner's OPEN list, newest first if several exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_open_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let list = sqlx::query_as::<_, ShoppingList>(
            r"
            SELECT id, owner_id, status, list_date, total, completed_at, created_at, updated_at
            FROM basket.shopping_list
            WHERE owner_id = $1 AND status = 'OPEN'
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            ",
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(list)
    }

    /// Create an empty OPEN list dated today.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_open(&self, owner: UserId) -> Result<ShoppingList, RepositoryError> {
        let list = sqlx::query_as::<_, ShoppingList>(
            r"
            INSERT INTO basket.shopping_list (owner_id)
            VALUES ($1)
            RETURNING id, owner_id, status, list_date, total, completed_at, created_at, updated_at
            ",
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(list)
    }

    /// Get a list by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShoppingListId) -> Result<Option<ShoppingList>, RepositoryError> {
        let list = sqlx::query_as::<_, ShoppingList>(
            r"
            SELECT id, owner_id, status, list_date, total, completed_at, created_at, updated_at
            FROM basket.shopping_list
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(list)
    }

    /// Completed lists owned by any of `owners`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_completed_for(
        &self,
        owners: &[UserId],
    ) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            r"
            SELECT l.id, l.owner_id, u.email AS owner_email, l.list_date, l.total,
                   (SELECT COUNT(*) FROM basket.shopping_list_item i WHERE i.list_id = l.id)
                       AS item_count,
                   l.completed_at
            FROM basket.shopping_list l
            JOIN basket.user u ON u.id = l.owner_id
            WHERE l.owner_id = ANY($1) AND l.status = 'COMPLETED'
            ORDER BY l.list_date DESC, l.completed_at DESC NULLS LAST, l.id DESC
            ",
        )
        .bind(owners)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Recompute and store a list's total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the list does not exist.
    pub async fn recompute_total(&self, id: ShoppingListId) -> Result<Money, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        items::recompute_total(&mut conn, id).await
    }

    /// Complete an OPEN list.
    ///
    /// In one transaction: the list is dated today, priced items are copied
    /// into the price history (with that date, credited to the owner), unpriced items move
    /// to a new OPEN list for the owner, and the list is marked COMPLETED with
    /// its final total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the list does not exist.
    /// Returns `RepositoryError::Conflict` if it is already completed.
    pub async fn finish(&self, id: ShoppingListId) -> Result<FinishedList, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, ShoppingList>(
            r"
            SELECT id, owner_id, status, list_date, total, completed_at, created_at, updated_at
            FROM basket.shopping_list
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if list.status != ListStatus::Open {
            return Err(RepositoryError::Conflict("list is already completed".to_owned()));
        }

        let purchased_on = sqlx::query_scalar::<_, NaiveDate>(
            "UPDATE basket.shopping_list SET list_date = CURRENT_DATE WHERE id = $1 RETURNING list_date",
        )
        .bind(list.id)
        .fetch_one(&mut *tx)
        .await?;

        let archived_prices =
            prices::record_for_list(&mut tx, list.id, list.owner_id, purchased_on).await?;

        let next_list = sqlx::query_scalar::<_, ShoppingListId>(
            "INSERT INTO basket.shopping_list (owner_id) VALUES ($1) RETURNING id",
        )
        .bind(list.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        let moved_items = items::move_unpriced(&mut tx, list.id, next_list).await?;
        let total = items::recompute_total(&mut tx, list.id).await?;

        sqlx::query(
            r"
            UPDATE basket.shopping_list
            SET status = 'COMPLETED', completed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(list.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(FinishedList {
            total,
            next_list,
            archived_prices,
            moved_items,
        })
    }

    /// Create a COMPLETED list with its items and price history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    pub async fn import_completed(
        &self,
        owner: UserId,
        list_date: NaiveDate,
        lines: &[ImportedItem],
    ) -> Result<ShoppingListId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, ShoppingListId>(
            r"
            INSERT INTO basket.shopping_list (owner_id, status, list_date, completed_at)
            VALUES ($1, 'COMPLETED', $2, NOW())
            RETURNING id
            ",
        )
        .bind(owner)
        .bind(list_date)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            items::insert(&mut tx, id, line.product, line.quantity, line.unit_price, true).await?;
        }
        prices::record_for_list(&mut tx, id, owner, list_date).await?;
        items::recompute_total(&mut tx, id).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Delete a list and its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the list does not exist.
    pub async fn delete(&self, id: ShoppingListId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM basket.shopping_list WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Number of lists in each status, as `(open, completed)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self) -> Result<(i64, i64), RepositoryError> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COUNT(*) FILTER (WHERE status = 'OPEN'),
                   COUNT(*) FILTER (WHERE status = 'COMPLETED')
            FROM basket.shopping_list
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}
