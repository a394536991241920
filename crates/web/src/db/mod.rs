//! Database operations for the Basket `PostgreSQL` schema.
//!
//! ## Tables (schema `basket`)
//!
//! - `user` - Accounts (email, display name, argon2 password hash)
//! - `shopping_list` - Lists, one OPEN per owner by convention
//! - `shopping_list_item` - Lines on a list, each pointing at a catalog product
//! - `catalog_product` - Deduplicated product names with optional category
//! - `category` - Grocery categories
//! - `price_history` - Prices paid, copied from completed lists
//! - `shared_access` - Directed grantor → grantee edges
//!
//! Sessions live in `tower_sessions.session`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p basket-cli -- migrate
//! ```

pub mod catalog;
pub mod items;
pub mod lists;
pub mod prices;
pub mod sharing;
pub mod users;

use std::time::Duration;

use basket_core::AmountError;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use items::ItemRepository;
pub use lists::{FinishedList, ImportedItem, ListRepository};
pub use prices::PriceHistoryRepository;
pub use sharing::SharingRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A computed amount does not fit its column.
    #[error("amount out of range: {0}")]
    Amount(#[from] AmountError),
}

impl RepositoryError {
    /// Map a unique-violation into `Conflict`, passing other errors through.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
