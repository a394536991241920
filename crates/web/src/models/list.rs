//! Shopping list domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;

use basket_core::{
    CategoryId, Email, ItemId, ListStatus, Money, ProductId, Quantity, ShoppingListId, UserId,
};

/// Label used for items whose product has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A shopping list row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShoppingList {
    pub id: ShoppingListId,
    pub owner_id: UserId,
    pub status: ListStatus,
    pub list_date: NaiveDate,
    pub total: Money,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingList {
    /// Whether items may still be added, edited or removed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_editable()
    }
}

/// A line item joined with its catalog product and category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListItem {
    pub id: ItemId,
    pub list_id: ShoppingListId,
    pub product_id: ProductId,
    pub product_name: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub quantity: Quantity,
    pub unit_price: Option<Money>,
    pub total: Money,
    pub checked: bool,
}

impl ListItem {
    /// Category label for grouping, falling back to [`UNCATEGORIZED`].
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Unit price formatted for an `<input>` value, empty when unpriced.
    #[must_use]
    pub fn unit_price_input(&self) -> String {
        self.unit_price.map(Money::plain).unwrap_or_default()
    }
}

/// A completed list as shown on the history page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: ShoppingListId,
    pub owner_id: UserId,
    pub owner_email: Email,
    pub list_date: NaiveDate,
    pub total: Money,
    pub item_count: i64,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Spend attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    pub name: String,
    pub total: Money,
    pub item_count: usize,
    /// Share of the list total, rounded to whole percent.
    pub share_percent: u32,
}

/// Spending summary of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub total: Money,
    pub item_count: usize,
    pub priced_count: usize,
    pub unpriced_count: usize,
    pub checked_count: usize,
    /// Categories ordered by spend, largest first.
    pub by_category: Vec<CategorySpend>,
}

impl ListSummary {
    /// Aggregate a list's items.
    #[must_use]
    pub fn from_items(items: &[ListItem]) -> Self {
        let total: Money = items.iter().map(|i| i.total).sum();
        let priced_count = items.iter().filter(|i| i.unit_price.is_some()).count();
        let checked_count = items.iter().filter(|i| i.checked).count();

        let mut groups: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
        for item in items {
            let entry = groups
                .entry(item.category_label())
                .or_insert((Money::ZERO, 0));
            entry.0 = entry.0 + item.total;
            entry.1 += 1;
        }

        let mut by_category: Vec<CategorySpend> = groups
            .into_iter()
            .map(|(name, (spend, count))| CategorySpend {
                name: name.to_owned(),
                total: spend,
                item_count: count,
                share_percent: share_percent(spend, total),
            })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        Self {
            total,
            item_count: items.len(),
            priced_count,
            unpriced_count: items.len() - priced_count,
            checked_count,
            by_category,
        }
    }
}

fn share_percent(part: Money, whole: Money) -> u32 {
    if whole.is_zero() {
        return 0;
    }
    (part.amount() * rust_decimal::Decimal::ONE_HUNDRED / whole.amount())
        .round()
        .to_u32()
        .unwrap_or(0)
}
