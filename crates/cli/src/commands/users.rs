//! User account commands.

use basket_core::UserId;
use basket_web::services::auth::{AuthService, Registration};

use super::{CommandError, connect};

/// Create an account with a password, as if registered through the site.
///
/// # Errors
///
/// Returns `CommandError::Auth` for invalid input or a taken email.
pub async fn create(email: &str, name: &str, password: &str) -> Result<UserId, CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .register(&Registration {
            email,
            name,
            password,
            password_confirm: password,
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(user.id)
}
