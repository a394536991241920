//! Business logic services.
//!
//! # Services
//!
//! - `access` - Accessible user IDs (own ID plus sharing grantors), cached
//! - `auth` - Email + password registration and login
//! - `catalog` - Product/category upserts, classification, suggestions
//! - `history` - Completed lists, JSON export and import
//! - `lists` - Open list lifecycle, item mutations, list totals
//! - `sharing` - Grant and revoke shared access
//!
//! Services borrow the pool (and the caches they need) from `AppState`;
//! see `AppState::lists()` and friends.

pub mod access;
pub mod auth;
pub mod catalog;
mod error;
pub mod history;
pub mod lists;
pub mod sharing;

pub use access::AccessResolver;
pub use catalog::{CatalogService, ReclassifyReport};
pub use error::ServiceError;
pub use history::{HistoryService, ImportReport};
pub use lists::{ItemInput, ListService, ListView};
pub use sharing::{SharingOverview, SharingService};
