//! Accessible-user resolution.
//!
//! A user may read and edit lists owned by themselves and by every account
//! that has granted them shared access. The set is a single query, cached
//! per user for a minute. Grants and revokes invalidate the grantee's entry;
//! the cache is process-local, so other instances see changes after the TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, warn};

use basket_core::UserId;

use crate::db::SharingRepository;

const ACCESS_TTL: Duration = Duration::from_secs(60);
const ACCESS_CAPACITY: u64 = 10_000;

/// Resolves and caches the set of owners a user can act for.
#[derive(Clone)]
pub struct AccessResolver {
    pool: PgPool,
    cache: Cache<UserId, Arc<[UserId]>>,
}

impl AccessResolver {
    /// Create a resolver with an empty cache.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let cache = Cache::builder()
            .max_capacity(ACCESS_CAPACITY)
            .time_to_live(ACCESS_TTL)
            .build();
        Self { pool, cache }
    }

    /// The user's own ID plus every grantor's ID.
    ///
    /// Never fails: if the lookup errors, only the user's own ID is returned
    /// and nothing is cached.
    pub async fn accessible_user_ids(&self, user: UserId) -> Arc<[UserId]> {
        if let Some(ids) = self.cache.get(&user).await {
            debug!(%user, "Access cache hit");
            return ids;
        }

        match SharingRepository::new(&self.pool).accessible_user_ids(user).await {
            Ok(mut ids) => {
                if !ids.contains(&user) {
                    ids.push(user);
                }
                let ids: Arc<[UserId]> = ids.into();
                self.cache.insert(user, Arc::clone(&ids)).await;
                ids
            }
            Err(e) => {
                warn!(%user, error = %e, "Failed to resolve shared access, using own ID only");
                Arc::from([user])
            }
        }
    }

    /// Whether `user` may act on data owned by `owner`.
    pub async fn can_access(&self, user: UserId, owner: UserId) -> bool {
        user == owner || self.accessible_user_ids(user).await.contains(&owner)
    }

    /// Drop the cached set for `user`.
    pub async fn invalidate(&self, user: UserId) {
        self.cache.invalidate(&user).await;
    }
}
