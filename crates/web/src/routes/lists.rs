//! Shopping list route handlers.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use basket_core::{ItemId, Money, ProductId, Quantity, ShoppingListId, line_total};

use super::{MessageQuery, PageContext, redirect_error, redirect_service_error, redirect_success};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{ListItem, ListSummary, ShoppingList};
use crate::services::{ItemInput, ListView};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Add-item form. Quantity and price are free text typed on a phone.
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
}

/// Edit-item form. An unchecked checkbox is simply absent.
#[derive(Debug, Deserialize)]
pub struct UpdateItemForm {
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
    pub checked: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// One item row on the list page.
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub item: ListItem,
    /// Last price paid, shown as a hint when the item has no price yet.
    pub last_price: Option<Money>,
}

/// Items of one category, in display order.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub name: String,
    pub rows: Vec<ItemRow>,
}

/// List page template.
#[derive(Template, WebTemplate)]
#[template(path = "lists/show.html")]
pub struct ListTemplate {
    pub ctx: PageContext,
    pub list: ShoppingList,
    pub groups: Vec<CategoryGroup>,
    pub summary: ListSummary,
    pub is_own: bool,
}

/// Spending summary template.
#[derive(Template, WebTemplate)]
#[template(path = "lists/summary.html")]
pub struct SummaryTemplate {
    pub ctx: PageContext,
    pub list: ShoppingList,
    pub summary: ListSummary,
}

/// Group items (already sorted by category) for rendering.
fn group_by_category(items: Vec<ListItem>, last_prices: &HashMap<ProductId, Money>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for item in items {
        let row = ItemRow {
            last_price: last_prices.get(&item.product_id).copied(),
            item,
        };
        match groups.last_mut() {
            Some(group) if group.name == row.item.category_label() => group.rows.push(row),
            _ => groups.push(CategoryGroup {
                name: row.item.category_label().to_owned(),
                rows: vec![row],
            }),
        }
    }
    groups
}

/// Parse the free-text quantity and price fields.
///
/// Returns the toast code to show on failure.
fn parse_item_input(quantity: &str, unit_price: &str) -> std::result::Result<ItemInput, &'static str> {
    let quantity = Quantity::parse_input(quantity).map_err(|_| "invalid_quantity")?;
    let unit_price = if unit_price.trim().is_empty() {
        None
    } else {
        Some(Money::parse_input(unit_price).map_err(|_| "invalid_price")?)
    };
    line_total(quantity, unit_price).map_err(|_| "invalid_price")?;
    Ok(ItemInput {
        quantity,
        unit_price,
    })
}

fn list_path(id: ShoppingListId) -> String {
    format!("/lists/{id}")
}

fn render_list(ctx: PageContext, view: ListView, is_own: bool) -> Response {
    let groups = group_by_category(view.items, &view.last_prices);
    ListTemplate {
        ctx,
        list: view.list,
        groups,
        summary: view.summary,
        is_own,
    }
    .into_response()
}

// =============================================================================
// Pages
// =============================================================================

/// The caller's OPEN list, created on first visit.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn current(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let list = state.lists().current_list(user.id).await?;
    let view = state.lists().view(user.id, list.id).await?;
    Ok(render_list(PageContext::for_user(&state, user, query), view, true))
}

/// Any list the caller can access.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShoppingListId>,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let view = state.lists().view(user.id, id).await?;
    let is_own = view.list.owner_id == user.id;
    Ok(render_list(PageContext::for_user(&state, user, query), view, is_own))
}

/// Spending summary of a list.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id))]
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShoppingListId>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let (list, summary) = state.lists().summary(user.id, id).await?;
    Ok(SummaryTemplate {
        ctx: PageContext::for_user(&state, user, query),
        list,
        summary,
    })
}

// =============================================================================
// Item Actions
// =============================================================================

/// Add an item by product name.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShoppingListId>,
    Form(form): Form<AddItemForm>,
) -> Redirect {
    let path = list_path(id);
    let input = match parse_item_input(&form.quantity, &form.unit_price) {
        Ok(input) => input,
        Err(code) => return redirect_error(&path, code),
    };

    match state.lists().add_item(user.id, id, &form.name, input).await {
        Ok(_) => Redirect::to(&path),
        Err(e) => redirect_service_error(&path, &e),
    }
}

/// Update an item's quantity, price and checked flag.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id, item_id = %item))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, item)): Path<(ShoppingListId, ItemId)>,
    Form(form): Form<UpdateItemForm>,
) -> Redirect {
    let path = list_path(id);
    let input = match parse_item_input(&form.quantity, &form.unit_price) {
        Ok(input) => input,
        Err(code) => return redirect_error(&path, code),
    };

    match state
        .lists()
        .update_item(user.id, id, item, input, form.checked.is_some())
        .await
    {
        Ok(()) => Redirect::to(&path),
        Err(e) => redirect_service_error(&path, &e),
    }
}

/// Remove an item.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id, item_id = %item))]
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, item)): Path<(ShoppingListId, ItemId)>,
) -> Redirect {
    let path = list_path(id);
    match state.lists().delete_item(user.id, id, item).await {
        Ok(()) => redirect_success(&path, "item_deleted"),
        Err(e) => redirect_service_error(&path, &e),
    }
}

// =============================================================================
// List Actions
// =============================================================================

/// Complete a list and continue on the fresh OPEN list.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id))]
pub async fn finish(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShoppingListId>,
) -> Redirect {
    match state.lists().finish(user.id, id).await {
        Ok(finished) => redirect_success(&list_path(finished.next_list), "list_finished"),
        Err(e) => redirect_service_error(&list_path(id), &e),
    }
}

/// Delete a list.
#[instrument(skip_all, fields(user_id = %user.id, list_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShoppingListId>,
) -> Redirect {
    match state.lists().delete_list(user.id, id).await {
        Ok(list) if list.is_open() => redirect_success("/lists/current", "list_deleted"),
        Ok(_) => redirect_success("/history", "list_deleted"),
        Err(e) => redirect_service_error(&list_path(id), &e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use basket_core::CategoryId;

    use super::*;

    fn item(id: i64, category: Option<&str>) -> ListItem {
        ListItem {
            id: ItemId::new(id),
            list_id: ShoppingListId::new(1),
            product_id: ProductId::new(id),
            product_name: format!("product {id}"),
            category_id: category.map(|_| CategoryId::new(1)),
            category_name: category.map(str::to_owned),
            quantity: Quantity::ONE,
            unit_price: None,
            total: Money::ZERO,
            checked: false,
        }
    }

    #[test]
    fn test_parse_item_input() {
        let input = parse_item_input("", "").unwrap();
        assert_eq!(input.quantity, Quantity::ONE);
        assert_eq!(input.unit_price, None);

        let input = parse_item_input("1,5", "€2,49").unwrap();
        assert_eq!(input.unit_price, Some(Money::from_cents(249)));

        assert_eq!(parse_item_input("0", "").unwrap_err(), "invalid_quantity");
        assert_eq!(parse_item_input("2", "two").unwrap_err(), "invalid_price");
        assert_eq!(
            parse_item_input("1000", "9999999999").unwrap_err(),
            "invalid_price"
        );
    }

    #[test]
    fn test_groups_consecutive_categories() {
        let items = vec![
            item(1, Some("Dairy & Eggs")),
            item(2, Some("Dairy & Eggs")),
            item(3, Some("Produce")),
            item(4, None),
        ];
        let last_prices = HashMap::from([(ProductId::new(3), Money::from_cents(99))]);

        let groups = group_by_category(items, &last_prices);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Dairy & Eggs", "Produce", "Uncategorized"]);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[1].rows[0].last_price, Some(Money::from_cents(99)));
        assert_eq!(groups[2].rows[0].last_price, None);
    }
}
