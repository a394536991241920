//! Shopping list service.
//!
//! Every item mutation is followed by a full recompute of the list total.
//! Only OPEN lists accept item changes; completed lists are read-only apart
//! from deletion.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, instrument};

use basket_core::{ItemId, Money, ProductId, Quantity, ShoppingListId, UserId, line_total};

use super::{AccessResolver, CatalogService, ServiceError};
use crate::db::{FinishedList, ItemRepository, ListRepository, PriceHistoryRepository, RepositoryError};
use crate::models::{ListItem, ListSummary, ShoppingList};

/// Quantity and price for a new or edited item.
#[derive(Debug, Clone, Copy)]
pub struct ItemInput {
    pub quantity: Quantity,
    pub unit_price: Option<Money>,
}

/// Everything the list page renders.
#[derive(Debug)]
pub struct ListView {
    pub list: ShoppingList,
    pub items: Vec<ListItem>,
    pub summary: ListSummary,
    /// Last price paid for products on the list, by accessible users.
    pub last_prices: HashMap<ProductId, Money>,
}

/// List operations on behalf of one caller.
pub struct ListService<'a> {
    pool: &'a PgPool,
    access: &'a AccessResolver,
    catalog: &'a CatalogService,
}

impl<'a> ListService<'a> {
    /// Create a list service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, access: &'a AccessResolver, catalog: &'a CatalogService) -> Self {
        Self {
            pool,
            access,
            catalog,
        }
    }

    /// The caller's OPEN list, created if they have none.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn current_list(&self, user: UserId) -> Result<ShoppingList, ServiceError> {
        let lists = ListRepository::new(self.pool);
        if let Some(list) = lists.find_open_for_owner(user).await? {
            return Ok(list);
        }

        let list = lists.create_open(user).await?;
        info!(list_id = %list.id, "Opened new shopping list");
        Ok(list)
    }

    /// Load a list the caller owns or has been granted access to.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` or `ServiceError::Forbidden`.
    pub async fn get_accessible(
        &self,
        user: UserId,
        id: ShoppingListId,
    ) -> Result<ShoppingList, ServiceError> {
        let list = ListRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if !self.access.can_access(user, list.owner_id).await {
            return Err(ServiceError::Forbidden);
        }
        Ok(list)
    }

    async fn get_editable(
        &self,
        user: UserId,
        id: ShoppingListId,
    ) -> Result<ShoppingList, ServiceError> {
        let list = self.get_accessible(user, id).await?;
        if !list.is_open() {
            return Err(ServiceError::ListClosed);
        }
        Ok(list)
    }

    /// Items, summary and last-paid prices for an accessible list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` or `ServiceError::Forbidden`.
    #[instrument(skip(self))]
    pub async fn view(&self, user: UserId, id: ShoppingListId) -> Result<ListView, ServiceError> {
        let list = self.get_accessible(user, id).await?;
        let items = ItemRepository::new(self.pool).list_for_list(list.id).await?;
        let summary = ListSummary::from_items(&items);

        let products: Vec<ProductId> = items.iter().map(|i| i.product_id).collect();
        let owners = self.access.accessible_user_ids(user).await;
        let last_prices = PriceHistoryRepository::new(self.pool)
            .latest_prices(&products, &owners)
            .await?;

        Ok(ListView {
            list,
            items,
            summary,
            last_prices,
        })
    }

    /// Add a product to a list by name, or update it if already there.
    ///
    /// On an existing item the quantity is replaced; the price is replaced
    /// only when a new one is given.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListClosed` for completed lists and
    /// `ServiceError::Invalid` for an empty product name.
    #[instrument(skip(self, input))]
    pub async fn add_item(
        &self,
        user: UserId,
        id: ShoppingListId,
        product_name: &str,
        input: ItemInput,
    ) -> Result<ItemId, ServiceError> {
        let list = self.get_editable(user, id).await?;
        let product = self.catalog.upsert_product(user, product_name, None).await?;
        let items = ItemRepository::new(self.pool);

        let item_id = match items.find_by_product(list.id, product.id).await? {
            Some(existing_id) => {
                let existing = items
                    .get(list.id, existing_id)
                    .await?
                    .ok_or(ServiceError::NotFound)?;
                let unit_price = input.unit_price.or(existing.unit_price);
                let line = line_total(input.quantity, unit_price)?;
                list.total.replace_part(existing.total, line)?;
                items
                    .update(list.id, existing_id, input.quantity, unit_price, existing.checked)
                    .await?;
                existing_id
            }
            None => {
                let line = line_total(input.quantity, input.unit_price)?;
                list.total.checked_add(line)?;
                items
                    .create(list.id, product.id, input.quantity, input.unit_price)
                    .await?
            }
        };

        self.recompute_total(list.id).await?;
        Ok(item_id)
    }

    /// Overwrite an item's quantity, price and checked flag.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListClosed` for completed lists and
    /// `ServiceError::NotFound` if the item is not on the list.
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        user: UserId,
        id: ShoppingListId,
        item: ItemId,
        input: ItemInput,
        checked: bool,
    ) -> Result<(), ServiceError> {
        let list = self.get_editable(user, id).await?;
        let items = ItemRepository::new(self.pool);
        let existing = items
            .get(list.id, item)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let line = line_total(input.quantity, input.unit_price)?;
        list.total.replace_part(existing.total, line)?;

        items
            .update(list.id, item, input.quantity, input.unit_price, checked)
            .await?;
        self.recompute_total(list.id).await?;
        Ok(())
    }

    /// Remove an item from a list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListClosed` for completed lists and
    /// `ServiceError::NotFound` if the item is not on the list.
    #[instrument(skip(self))]
    pub async fn delete_item(
        &self,
        user: UserId,
        id: ShoppingListId,
        item: ItemId,
    ) -> Result<(), ServiceError> {
        let list = self.get_editable(user, id).await?;
        ItemRepository::new(self.pool).delete(list.id, item).await?;
        self.recompute_total(list.id).await?;
        Ok(())
    }

    /// Sum item totals into the list total.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the list is gone.
    pub async fn recompute_total(&self, id: ShoppingListId) -> Result<Money, ServiceError> {
        Ok(ListRepository::new(self.pool).recompute_total(id).await?)
    }

    /// Complete an OPEN list, archive its prices and carry unpriced items
    /// over to a fresh OPEN list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListClosed` if the list is already completed.
    #[instrument(skip(self))]
    pub async fn finish(
        &self,
        user: UserId,
        id: ShoppingListId,
    ) -> Result<FinishedList, ServiceError> {
        let list = self.get_editable(user, id).await?;
        let finished = ListRepository::new(self.pool)
            .finish(list.id)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::ListClosed,
                other => other.into(),
            })?;

        info!(
            list_id = %list.id,
            total = %finished.total,
            archived_prices = finished.archived_prices,
            moved_items = finished.moved_items,
            next_list_id = %finished.next_list,
            "Shopping list completed"
        );
        Ok(finished)
    }

    /// Delete an accessible list in any status, returning what was deleted.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` or `ServiceError::Forbidden`.
    #[instrument(skip(self))]
    pub async fn delete_list(
        &self,
        user: UserId,
        id: ShoppingListId,
    ) -> Result<ShoppingList, ServiceError> {
        let list = self.get_accessible(user, id).await?;
        ListRepository::new(self.pool).delete(list.id).await?;
        info!(list_id = %list.id, "Shopping list deleted");
        Ok(list)
    }

    /// Spending summary for an accessible list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` or `ServiceError::Forbidden`.
    pub async fn summary(
        &self,
        user: UserId,
        id: ShoppingListId,
    ) -> Result<(ShoppingList, ListSummary), ServiceError> {
        let list = self.get_accessible(user, id).await?;
        let items = ItemRepository::new(self.pool).list_for_list(list.id).await?;
        Ok((list, ListSummary::from_items(&items)))
    }
}
