//! Driver-facing entry/exit request handlers.
//!
//! A request only places a pending marker; nothing moves until the physical
//! gate trigger confirms it within the confirmation window.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of an accepted entry/exit request.
#[derive(Debug, Serialize)]
pub struct PendingRequest {
    /// Always `"pending"`.
    pub status: &'static str,
    /// Seconds the gate trigger has to confirm before the request expires.
    pub confirm_within_secs: u64,
}

/// POST /api/v1/entry/request
///
/// Ask to enter the lot. Places the pending entry marker; the driver then
/// approaches the entry gate, whose trigger confirms the request.
pub async fn request_entry(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.entry.request_entry(&user.user_id).await?;

    tracing::info!(user_id = %user.user_id, "Entry requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: PendingRequest {
                status: "pending",
                confirm_within_secs: state.config.protocol.confirmation_window.as_secs(),
            },
        }),
    ))
}

/// POST /api/v1/exit/request
///
/// Ask to leave the lot with a paid ticket. Places the pending exit marker;
/// the exit gate trigger confirms it.
pub async fn request_exit(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.exit.request_exit(&user.user_id).await?;

    tracing::info!(user_id = %user.user_id, "Exit requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: PendingRequest {
                status: "pending",
                confirm_within_secs: state.config.protocol.confirmation_window.as_secs(),
            },
        }),
    ))
}
