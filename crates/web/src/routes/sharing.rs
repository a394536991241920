//! Sharing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use basket_core::UserId;

use super::{MessageQuery, PageContext, redirect_service_error, redirect_success};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::ShareGrant;
use crate::state::AppState;

/// Grant form data.
#[derive(Debug, Deserialize)]
pub struct GrantForm {
    pub email: String,
}

/// Sharing page template.
#[derive(Template, WebTemplate)]
#[template(path = "sharing/index.html")]
pub struct SharingTemplate {
    pub ctx: PageContext,
    pub granted: Vec<ShareGrant>,
    pub received: Vec<ShareGrant>,
}

/// Grants given and received.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let overview = state.sharing().overview(user.id).await?;
    Ok(SharingTemplate {
        ctx: PageContext::for_user(&state, user, query),
        granted: overview.granted,
        received: overview.received,
    })
}

/// Share the caller's lists with another account.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn grant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<GrantForm>,
) -> Redirect {
    match state.sharing().grant(user.id, &form.email).await {
        Ok(_) => redirect_success("/sharing", "shared"),
        Err(e) => redirect_service_error("/sharing", &e),
    }
}

/// Stop sharing with `grantee`.
#[instrument(skip_all, fields(user_id = %user.id, %grantee))]
pub async fn revoke(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(grantee): Path<UserId>,
) -> Redirect {
    match state.sharing().revoke(user.id, grantee).await {
        Ok(()) => redirect_success("/sharing", "revoked"),
        Err(e) => redirect_service_error("/sharing", &e),
    }
}
