//! Unified error handling with Sentry integration.
//!
//! Page and API handlers return [`Result<T>`]; form handlers turn service
//! errors into a redirect with an `?error=` code instead (see
//! [`crate::routes::redirect_error`]). Server-side failures are reported to
//! Sentry before the client sees a generic page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;
use crate::routes::PageContext;
use crate::services::ServiceError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// The list, product or page does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Logged in, but the owner has not shared with the caller.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The request conflicts with the resource state (e.g. a completed list).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Anything else that is our fault.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(e) => Self::Database(e),
            ServiceError::NotFound => Self::NotFound("that no longer exists".to_owned()),
            ServiceError::Forbidden => {
                Self::Forbidden("this list has not been shared with you".to_owned())
            }
            ServiceError::ListClosed => {
                Self::Conflict("this list is completed and can't be changed".to_owned())
            }
            other => Self::BadRequest(other.to_string()),
        }
    }
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ErrorTemplate {
    ctx: PageContext,
    status: u16,
    title: &'static str,
    message: String,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text safe to show the client. Server errors stay opaque.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => {
                "Something went wrong on our side. Please try again.".to_owned()
            }
            Self::NotFound(msg) | Self::Forbidden(msg) | Self::Conflict(msg) | Self::BadRequest(msg) => {
                msg.clone()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let page = ErrorTemplate {
            ctx: PageContext::anonymous(),
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            message: self.public_message(),
        };
        (status, page).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status() {
        let cases = [
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::ListClosed, StatusCode::CONFLICT),
            (ServiceError::SelfShare, StatusCode::BAD_REQUEST),
            (
                ServiceError::Repository(RepositoryError::Conflict("x".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("connection string postgres://secret".to_owned());
        assert!(!err.public_message().contains("secret"));

        let err = AppError::NotFound("product 7".to_owned());
        assert_eq!(err.public_message(), "product 7");
    }

    #[test]
    fn test_error_page_carries_status() {
        let response = AppError::Forbidden("nope".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
