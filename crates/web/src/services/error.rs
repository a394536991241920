//! Service-layer errors.

use basket_core::AmountError;
use basket_core::snapshot::SnapshotError;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors returned by the list, history, catalog and sharing services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller may not see or change this resource.
    #[error("forbidden")]
    Forbidden,

    /// The resource does not exist.
    #[error("not found")]
    NotFound,

    /// The list is completed and no longer accepts changes.
    #[error("list is completed")]
    ListClosed,

    /// User input failed validation.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// A price, or the totals it feeds, is out of range.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// No account uses the given email.
    #[error("no account with that email")]
    UnknownUser,

    /// A user tried to share with themselves.
    #[error("cannot share with yourself")]
    SelfShare,

    /// An uploaded history snapshot could not be read.
    #[error(transparent)]
    InvalidSnapshot(#[from] SnapshotError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Amount(e) => Self::Amount(e),
            other => Self::Repository(other),
        }
    }
}

impl ServiceError {
    /// Short code carried in `?error=` redirects.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ListClosed => "list_closed",
            Self::Invalid(_) => "invalid_input",
            Self::Amount(_) => "invalid_price",
            Self::UnknownUser => "unknown_user",
            Self::SelfShare => "self_share",
            Self::InvalidSnapshot(_) => "invalid_snapshot",
            Self::Repository(_) => "server_error",
        }
    }

    /// Whether this is a server-side failure rather than a user mistake.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Repository(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err = ServiceError::from(RepositoryError::NotFound);
        assert!(matches!(err, ServiceError::NotFound));
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_out_of_range_amounts_are_user_errors() {
        let err = ServiceError::from(RepositoryError::Amount(AmountError::TooLarge));
        assert!(matches!(err, ServiceError::Amount(AmountError::TooLarge)));
        assert!(!err.is_server_error());
        assert_eq!(err.code(), "invalid_price");
    }

    #[test]
    fn test_other_repository_errors_are_server_errors() {
        let err = ServiceError::from(RepositoryError::DataCorruption("bad row".to_owned()));
        assert!(err.is_server_error());
        assert_eq!(err.code(), "server_error");
    }
}
