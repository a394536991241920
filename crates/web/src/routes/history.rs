//! History route handlers: completed lists, export and import.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::{instrument, warn};

use super::{MessageQuery, PageContext, redirect_error, redirect_service_error, redirect_success};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::HistoryEntry;
use crate::services::ImportReport;
use crate::state::AppState;

/// Multipart field carrying the snapshot file.
const IMPORT_FIELD: &str = "file";

/// History page template.
#[derive(Template, WebTemplate)]
#[template(path = "history/index.html")]
pub struct HistoryTemplate {
    pub ctx: PageContext,
    pub entries: Vec<HistoryEntry>,
    pub viewer_id: basket_core::UserId,
}

/// Completed lists of the caller and everyone sharing with them.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let entries = state.history().completed(user.id).await?;
    Ok(HistoryTemplate {
        viewer_id: user.id,
        ctx: PageContext::for_user(&state, user, query),
        entries,
    })
}

/// Download the caller's completed lists as JSON.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn export(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let snapshot = state.history().export(user.id).await?;
    let body = serde_json::to_vec_pretty(&snapshot).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize history snapshot");
        AppError::Internal("failed to serialize history".to_owned())
    })?;

    let disposition = format!(
        "attachment; filename=\"basket-history-{}.json\"",
        Utc::now().format("%Y-%m-%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Upload a snapshot produced by [`export`].
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn import(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Redirect {
    let max_bytes = state.config().import_max_bytes;

    let bytes = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(IMPORT_FIELD) => match field.bytes().await {
                Ok(bytes) => break bytes,
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    return redirect_error("/history", "import_too_large");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read import upload");
                    return redirect_error("/history", "invalid_snapshot");
                }
            },
            Ok(Some(_)) => {}
            Ok(None) => return redirect_error("/history", "missing_file"),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return redirect_error("/history", "import_too_large");
            }
            Err(e) => {
                warn!(error = %e, "Malformed import upload");
                return redirect_error("/history", "invalid_snapshot");
            }
        }
    };

    if bytes.is_empty() {
        return redirect_error("/history", "missing_file");
    }
    if bytes.len() > max_bytes {
        return redirect_error("/history", "import_too_large");
    }

    match state.history().import(user.id, &bytes).await {
        Ok(report) => redirect_success("/history", import_outcome(report)),
        Err(e) => redirect_service_error("/history", &e),
    }
}

/// Toast code for a finished import.
const fn import_outcome(report: ImportReport) -> &'static str {
    if report.skipped > 0 {
        "imported_partial"
    } else {
        "imported"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_outcome() {
        let clean = ImportReport {
            imported: 3,
            skipped: 0,
            items: 12,
        };
        assert_eq!(import_outcome(clean), "imported");

        let partial = ImportReport {
            skipped: 1,
            ..clean
        };
        assert_eq!(import_outcome(partial), "imported_partial");
    }
}
