use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parkgate_core::error::CoreError;
use parkgate_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for backend
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `parkgate_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, deadline) = match &self {
            AppError::Core(core) => match core {
                CoreError::Unauthenticated(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHENTICATED",
                    msg.clone(),
                    None,
                ),
                CoreError::InvalidArgument(msg) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_ARGUMENT",
                    msg.clone(),
                    None,
                ),
                CoreError::FailedPrecondition(msg) => (
                    StatusCode::CONFLICT,
                    "FAILED_PRECONDITION",
                    msg.clone(),
                    None,
                ),
                CoreError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None)
                }
                CoreError::Expired { message, deadline } => {
                    (StatusCode::GONE, "EXPIRED", message.clone(), Some(*deadline))
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            },

            AppError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(deadline) = deadline {
            body["deadline"] = json!(deadline);
        }

        (status, axum::Json(body)).into_response()
    }
}
