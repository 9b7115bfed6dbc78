//! Spot grid read handler.

use axum::extract::State;
use axum::Json;

use parkgate_core::protocol::SPOTS;
use parkgate_core::spot::ParkingSpot;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/spots
///
/// The full spot grid, ordered by spot number, so the app can render the
/// lot map.
pub async fn list_spots(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ParkingSpot>>>> {
    let rows = state.store.list(SPOTS).await?;

    let mut spots = Vec::with_capacity(rows.len());
    for (doc_id, value) in rows {
        let spot: ParkingSpot = serde_json::from_value(value).map_err(|e| {
            parkgate_core::error::CoreError::Internal(format!(
                "corrupt document {SPOTS}/{doc_id}: {e}"
            ))
        })?;
        spots.push(spot);
    }
    spots.sort_by_key(|s| s.number);

    Ok(Json(DataResponse { data: spots }))
}
