//! Price history types.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use basket_core::{Email, Money, PriceEntryId, ProductId, ShoppingListId};

/// One recorded purchase price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceEntry {
    pub id: PriceEntryId,
    pub product_id: ProductId,
    pub price: Money,
    pub purchased_on: NaiveDate,
    pub list_id: Option<ShoppingListId>,
    /// Account that paid this price.
    pub user_email: Email,
}

/// Aggregate statistics over a product's price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceStats {
    pub count: usize,
    pub min: Money,
    pub max: Money,
    pub average: Money,
    /// Most recent price by purchase date.
    pub latest: Money,
    /// Change from the previous purchase to the latest one.
    pub trend: Trend,
}

/// Direction of the last price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "●",
        }
    }
}

impl PriceStats {
    /// Compute statistics, or `None` for an empty history.
    ///
    /// Entries may come in any order; `latest` and `trend` use
    /// `purchased_on`, with the entry ID breaking same-day ties.
    #[must_use]
    pub fn from_entries(entries: &[PriceEntry]) -> Option<Self> {
        let mut ordered: Vec<&PriceEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| (e.purchased_on, e.id));

        let latest = ordered.last()?.price;
        let previous = ordered.len().checked_sub(2).and_then(|i| ordered.get(i));
        let trend = match previous.map(|p| latest.cmp(&p.price)) {
            Some(std::cmp::Ordering::Greater) => Trend::Up,
            Some(std::cmp::Ordering::Less) => Trend::Down,
            _ => Trend::Flat,
        };

        let min = ordered.iter().map(|e| e.price).min()?;
        let max = ordered.iter().map(|e| e.price).max()?;
        let sum: Money = ordered.iter().map(|e| e.price).sum();
        let average = Money::new(sum.amount() / Decimal::from(ordered.len())).unwrap_or(sum);

        Some(Self {
            count: ordered.len(),
            min,
            max,
            average,
            latest,
            trend,
        })
    }
}
