//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database)
//! GET  /                                - Redirect to the current list
//!
//! # Auth (rate limited)
//! GET  /auth/login                      - Login page
//! POST /auth/login                      - Login action
//! GET  /auth/register                   - Register page
//! POST /auth/register                   - Register action
//! POST /auth/logout                     - Logout action
//!
//! # Lists (requires auth)
//! GET  /lists/current                   - Caller's OPEN list, created on demand
//! GET  /lists/{id}                      - List page
//! POST /lists/{id}/items                - Add item (or update it if already listed)
//! POST /lists/{id}/items/{item}         - Update item
//! POST /lists/{id}/items/{item}/delete  - Remove item
//! POST /lists/{id}/finish               - Complete list
//! POST /lists/{id}/delete               - Delete list
//! GET  /lists/{id}/summary              - Spending summary
//!
//! # History (requires auth)
//! GET  /history                         - Completed lists
//! GET  /history/export                  - JSON download
//! POST /history/import                  - JSON upload (multipart)
//!
//! # Products (requires auth)
//! GET  /products/{id}                   - Price history
//! GET  /api/products/suggest?q=         - Autocomplete (JSON)
//!
//! # Sharing (requires auth)
//! GET  /sharing                         - Grants given and received
//! POST /sharing                         - Grant access by email
//! POST /sharing/{user}/revoke           - Revoke access
//!
//! # Admin (configured admin account only)
//! GET  /admin                           - Stats and users
//! GET  /admin/categories                - Category list
//! POST /admin/categories                - Create category
//! POST /admin/categories/{id}/rename    - Rename category
//! POST /admin/categories/{id}/delete    - Delete category
//! POST /admin/reclassify                - Classify uncategorized products
//! ```
//!
//! Form handlers answer with a redirect carrying `?error=<code>` or
//! `?success=<code>`; pages render the code as a toast.

pub mod admin;
pub mod auth;
pub mod health;
pub mod history;
pub mod lists;
pub mod products;
pub mod sharing;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::models::CurrentUser;
use crate::services::ServiceError;
use crate::state::AppState;

// =============================================================================
// Shared page helpers
// =============================================================================

/// Query parameters for toast display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Layout data every page template receives as `ctx`.
#[derive(Debug)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub is_admin: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl PageContext {
    /// Build the layout context for a request.
    #[must_use]
    pub fn new(state: &AppState, user: Option<CurrentUser>, query: MessageQuery) -> Self {
        let is_admin = user
            .as_ref()
            .is_some_and(|u| state.config().is_admin(&u.email));
        Self {
            user,
            is_admin,
            error: query.error,
            success: query.success,
        }
    }

    /// Context for a page rendered without a session, such as an error page.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            is_admin: false,
            error: None,
            success: None,
        }
    }

    /// Context for a logged-in page.
    #[must_use]
    pub fn for_user(state: &AppState, user: CurrentUser, query: MessageQuery) -> Self {
        Self::new(state, Some(user), query)
    }
}

/// Redirect to `path` with an `error` toast code.
#[must_use]
pub fn redirect_error(path: &str, code: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(code)))
}

/// Redirect to `path` with a `success` toast code.
#[must_use]
pub fn redirect_success(path: &str, code: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(code)))
}

/// Log a service error from a form post and redirect with its code.
pub(crate) fn redirect_service_error(path: &str, err: &ServiceError) -> Redirect {
    if err.is_server_error() {
        tracing::error!(error = %err, "Form action failed");
    } else {
        tracing::debug!(error = %err, "Form action rejected");
    }
    redirect_error(path, err.code())
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
///
/// Kept separate from [`routes`] so [`crate::app`] can wrap it in a rate limiter.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/products/suggest", get(products::suggest))
}

/// Create the list routes router.
pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(lists::current))
        .route("/{id}", get(lists::show))
        .route("/{id}/items", post(lists::add_item))
        .route("/{id}/items/{item}", post(lists::update_item))
        .route("/{id}/items/{item}/delete", post(lists::delete_item))
        .route("/{id}/finish", post(lists::finish))
        .route("/{id}/delete", post(lists::delete))
        .route("/{id}/summary", get(lists::summary))
}

/// Room for multipart boundaries and part headers around the uploaded file.
///
/// The file itself is held to `import_max_bytes` by the handler.
pub const MULTIPART_HEADROOM: usize = 64 * 1024;

/// Create the history routes router.
pub fn history_routes(import_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(history::index))
        .route("/export", get(history::export))
        .route(
            "/import",
            post(history::import).layer(DefaultBodyLimit::max(
                import_max_bytes.saturating_add(MULTIPART_HEADROOM),
            )),
        )
}

/// Create the sharing routes router.
pub fn sharing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sharing::index).post(sharing::grant))
        .route("/{user}/revoke", post(sharing::revoke))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route(
            "/categories",
            get(admin::categories).post(admin::create_category),
        )
        .route("/categories/{id}/rename", post(admin::rename_category))
        .route("/categories/{id}/delete", post(admin::delete_category))
        .route("/reclassify", post(admin::reclassify))
}

/// Create all page routes except `/auth` and `/api`.
pub fn routes(import_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/lists/current") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/lists", list_routes())
        .nest("/history", history_routes(import_max_bytes))
        .route("/products/{id}", get(products::show))
        .nest("/sharing", sharing_routes())
        .nest("/admin", admin_routes())
}
