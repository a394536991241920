//! Sharing service: one-way grants of list access between accounts.

use sqlx::PgPool;
use tracing::{info, instrument};

use basket_core::{Email, UserId};

use super::{AccessResolver, CatalogService, ServiceError};
use crate::db::{SharingRepository, UserRepository};
use crate::models::{ShareGrant, User};

/// Grants given and received by one user.
#[derive(Debug, Default)]
pub struct SharingOverview {
    /// People the user shares their lists with.
    pub granted: Vec<ShareGrant>,
    /// People who share their lists with the user.
    pub received: Vec<ShareGrant>,
}

/// Sharing operations on behalf of one caller.
pub struct SharingService<'a> {
    pool: &'a PgPool,
    access: &'a AccessResolver,
    catalog: &'a CatalogService,
}

impl<'a> SharingService<'a> {
    /// Create a sharing service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        access: &'a AccessResolver,
        catalog: &'a CatalogService,
    ) -> Self {
        Self {
            pool,
            access,
            catalog,
        }
    }

    /// Drop everything cached about what `grantee` can see.
    async fn forget(&self, grantee: UserId) {
        self.forget(grantee).await;
        self.catalog.invalidate_user(grantee).await;
    }

    /// Let the account with `grantee_email` access the grantor's lists.
    ///
    /// Granting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` for a malformed email,
    /// `ServiceError::UnknownUser` if nobody uses it and
    /// `ServiceError::SelfShare` if it is the grantor's own.
    #[instrument(skip(self))]
    pub async fn grant(&self, grantor: UserId, grantee_email: &str) -> Result<User, ServiceError> {
        let email = Email::parse(grantee_email).map_err(|e| ServiceError::Invalid(e.to_string()))?;
        let grantee = UserRepository::new(self.pool)
            .get_by_email(&email)
            .await?
            .ok_or(ServiceError::UnknownUser)?;

        if grantee.id == grantor {
            return Err(ServiceError::SelfShare);
        }

        let created = SharingRepository::new(self.pool)
            .grant(grantor, grantee.id)
            .await?;
        self.forget(grantee.id).await;

        if created {
            info!(grantee_id = %grantee.id, "Shared access granted");
        }
        Ok(grantee)
    }

    /// Withdraw a grant. Revoking a grant that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn revoke(&self, grantor: UserId, grantee: UserId) -> Result<(), ServiceError> {
        let removed = SharingRepository::new(self.pool)
            .revoke(grantor, grantee)
            .await?;
        self.forget(grantee).await;

        if removed {
            info!(%grantee, "Shared access revoked");
        }
        Ok(())
    }

    /// Grants the user has given and received.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    pub async fn overview(&self, user: UserId) -> Result<SharingOverview, ServiceError> {
        let repo = SharingRepository::new(self.pool);
        Ok(SharingOverview {
            granted: repo.granted_by(user).await?,
            received: repo.granted_to(user).await?,
        })
    }
}
