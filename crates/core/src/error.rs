use crate::types::Timestamp;

/// Protocol error taxonomy.
///
/// Precondition and not-found variants carry user-facing messages that are
/// surfaced verbatim to the caller; `Internal` messages are logged and
/// sanitized at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Precondition failed: {0}")]
    FailedPrecondition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request expired at {deadline}: {message}")]
    Expired {
        message: String,
        deadline: Timestamp,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
