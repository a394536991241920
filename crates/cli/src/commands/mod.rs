//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod share;
pub mod users;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use basket_web::db::{RepositoryError, create_pool};
use basket_web::services::ServiceError;
use basket_web::services::auth::AuthError;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// No account uses the given email.
    #[error("No user with email: {0}")]
    UnknownUser(String),
}

/// Connect using `BASKET_DATABASE_URL`, falling back to `DATABASE_URL`.
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BASKET_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("BASKET_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(create_pool(&database_url).await?)
}
