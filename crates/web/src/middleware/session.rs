//! Session middleware configuration.
//!
//! Cookie settings for tower-sessions. The binary pairs them with the
//! `PostgreSQL` store (`tower_sessions.session`, created by the migrations);
//! tests use the in-memory store.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::BasketConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "basket_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Apply Basket's cookie settings to any session store.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(
    store: S,
    config: &BasketConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
