//! Domain models for Basket.
//!
//! Row types decode straight from sqlx queries (`FromRow`); the view-side
//! aggregates (`ListSummary`, `PriceStats`) are computed in Rust so they can
//! be tested without a database.

pub mod catalog;
pub mod list;
pub mod price;
pub mod session;
pub mod sharing;
pub mod user;

pub use catalog::{CatalogProduct, Category, CategoryUsage};
pub use list::{CategorySpend, HistoryEntry, ListItem, ListSummary, ShoppingList};
pub use price::{PriceEntry, PriceStats, Trend};
pub use session::{CurrentUser, keys as session_keys};
pub use sharing::ShareGrant;
pub use user::User;
