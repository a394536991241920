//! Shared-access repository.
//!
//! A row `(grantor, grantee)` lets the grantee read and edit every list the
//! grantor owns. Edges are directed and not transitive.

use sqlx::PgPool;

use basket_core::UserId;

use super::RepositoryError;
use crate::models::ShareGrant;

/// Repository for `basket.shared_access`.
pub struct SharingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SharingRepository<'a> {
    /// Create a new sharing repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's own ID plus every grantor who shared with them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn accessible_user_ids(&self, user: UserId) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, UserId>(
            r"
            SELECT $1::BIGINT AS id
            UNION
            SELECT grantor_id FROM basket.shared_access WHERE grantee_id = $1
            ORDER BY id
            ",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Record a grant. Returns `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn grant(&self, grantor: UserId, grantee: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO basket.shared_access (grantor_id, grantee_id)
            VALUES ($1, $2)
            ON CONFLICT (grantor_id, grantee_id) DO NOTHING
            ",
        )
        .bind(grantor)
        .bind(grantee)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a grant. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revoke(&self, grantor: UserId, grantee: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM basket.shared_access WHERE grantor_id = $1 AND grantee_id = $2",
        )
        .bind(grantor)
        .bind(grantee)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Accounts the grantor has shared with.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn granted_by(&self, grantor: UserId) -> Result<Vec<ShareGrant>, RepositoryError> {
        let grants = sqlx::query_as::<_, ShareGrant>(
            r"
            SELECT u.id AS user_id, u.email, u.name, sa.created_at
            FROM basket.shared_access sa
            JOIN basket.user u ON u.id = sa.grantee_id
            WHERE sa.grantor_id = $1
            ORDER BY sa.created_at DESC
            ",
        )
        .bind(grantor)
        .fetch_all(self.pool)
        .await?;

        Ok(grants)
    }

    /// Accounts that have shared with the grantee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn granted_to(&self, grantee: UserId) -> Result<Vec<ShareGrant>, RepositoryError> {
        let grants = sqlx::query_as::<_, ShareGrant>(
            r"
            SELECT u.id AS user_id, u.email, u.name, sa.created_at
            FROM basket.shared_access sa
            JOIN basket.user u ON u.id = sa.grantor_id
            WHERE sa.grantee_id = $1
            ORDER BY sa.created_at DESC
            ",
        )
        .bind(grantee)
        .fetch_all(self.pool)
        .await?;

        Ok(grants)
    }
}
