//! Authentication route handlers.
//!
//! Handles login, registration and logout with email + password accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{MessageQuery, PageContext, redirect_error, redirect_success};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, or skip it when already logged in.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/lists/current").into_response();
    }
    LoginTemplate {
        ctx: PageContext::new(&state, None, query),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => start_session(&session, &user, "/lists/current").await,
        Err(e) => {
            if matches!(e, AuthError::Repository(_)) {
                tracing::error!(error = %e, "Login failed");
            } else {
                tracing::info!(error = %e, "Login rejected");
            }
            redirect_error("/auth/login", e.code())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/lists/current").into_response();
    }
    RegisterTemplate {
        ctx: PageContext::new(&state, None, query),
    }
    .into_response()
}

/// Handle registration form submission and log the new user in.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Redirect {
    let registration = Registration {
        email: &form.email,
        name: &form.name,
        password: &form.password,
        password_confirm: &form.password_confirm,
    };

    match AuthService::new(state.pool()).register(&registration).await {
        Ok(user) => start_session(&session, &user, "/lists/current").await,
        Err(e) => {
            if matches!(e, AuthError::Repository(_) | AuthError::PasswordHash) {
                tracing::error!(error = %e, "Registration failed");
            } else {
                tracing::info!(error = %e, "Registration rejected");
            }
            redirect_error("/auth/register", e.code())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!(error = %e, "Failed to clear session user");
    }
    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to flush session");
    }
    clear_sentry_user();
    redirect_success("/auth/login", "logged_out")
}

/// Rotate the session ID, store the user and redirect.
async fn start_session(session: &Session, user: &User, to: &str) -> Redirect {
    let current = CurrentUser::from(user);

    if let Err(e) = session.cycle_id().await {
        tracing::error!(error = %e, "Failed to rotate session id");
        return redirect_error("/auth/login", "session");
    }
    if let Err(e) = set_current_user(session, &current).await {
        tracing::error!(error = %e, "Failed to set session");
        return redirect_error("/auth/login", "session");
    }

    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(user_id = %current.id, "User logged in");
    Redirect::to(to)
}
