//! Sharing commands.

use basket_core::Email;
use basket_web::db::UserRepository;
use basket_web::services::{AccessResolver, CatalogService, SharingService};

use super::{CommandError, connect};

/// Let `grantee` see and edit `grantor`'s lists.
///
/// # Errors
///
/// Returns `CommandError::UnknownUser` if the grantor does not exist and
/// `CommandError::Service` if the grant is rejected.
pub async fn grant(grantor: &str, grantee: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let grantor_email =
        Email::parse(grantor).map_err(|_| CommandError::UnknownUser(grantor.to_owned()))?;
    let grantor_user = UserRepository::new(&pool)
        .get_by_email(&grantor_email)
        .await?
        .ok_or_else(|| CommandError::UnknownUser(grantor.to_owned()))?;

    let access = AccessResolver::new(pool.clone());
    let catalog = CatalogService::new(pool.clone());
    let grantee_user = SharingService::new(&pool, &access, &catalog)
        .grant(grantor_user.id, grantee)
        .await?;

    tracing::info!(
        grantor = %grantor_user.email,
        grantee = %grantee_user.email,
        "Shared access granted"
    );
    Ok(())
}
