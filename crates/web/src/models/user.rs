//! User domain types.

use chrono::{DateTime, Utc};

use basket_core::{Email, UserId};

/// A Basket account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email, normalized to lowercase.
    pub email: Email,
    /// Display name shown to people the user shares with.
    pub name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
