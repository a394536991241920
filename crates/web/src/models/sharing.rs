//! Sharing grants as displayed on the sharing page.

use chrono::{DateTime, Utc};

use basket_core::{Email, UserId};

/// The other side of a shared-access edge.
///
/// On the "granted by me" list this is the grantee; on the "shared with me"
/// list it is the grantor.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShareGrant {
    pub user_id: UserId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
