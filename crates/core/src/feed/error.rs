//! Feed error types.

use fluxo_shared::AppError;
use thiserror::Error;

/// Failures of the transaction source or the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The access gate does not allow subscribing to the scope.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The source could not deliver a snapshot.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source stream ended.
    #[error("source closed")]
    Closed,
}

impl FeedError {
    /// Create a permission denied error.
    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied(reason.into())
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::PermissionDenied(msg) => Self::Forbidden(msg),
            FeedError::Unavailable(msg) => Self::ExternalService(msg),
            FeedError::Closed => Self::ExternalService("source closed".into()),
        }
    }
}
