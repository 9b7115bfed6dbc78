//! Gate- and sensor-facing handlers.
//!
//! These endpoints are called by the on-site gate controllers and the spot
//! sensor bridge, not by drivers. They carry no token auth; the deployment
//! restricts them to the gate LAN.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use parkgate_coord::Assignment;
use parkgate_core::types::TicketId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body returned when a gate confirmation succeeds.
#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub ticket_id: TicketId,
}

/// Body of a spot sensor report.
#[derive(Debug, Deserialize)]
pub struct SpotReport {
    /// Spot designator as the sensor reports it, e.g. `"3"` or `"spot3"`.
    pub spot: String,
}

/// POST /api/v1/gate/entry/confirm
///
/// The entry gate trigger fired: mint a ticket for the pending entry
/// request and open the barrier.
pub async fn confirm_entry(State(state): State<AppState>) -> AppResult<Json<DataResponse<Confirmation>>> {
    let ticket_id = state.entry.confirm_entry().await?;

    Ok(Json(DataResponse {
        data: Confirmation { ticket_id },
    }))
}

/// POST /api/v1/gate/exit/confirm
///
/// The exit gate trigger fired: complete the pending exit's ticket and open
/// the barrier.
pub async fn confirm_exit(State(state): State<AppState>) -> AppResult<Json<DataResponse<Confirmation>>> {
    let ticket_id = state.exit.confirm_exit().await?;

    Ok(Json(DataResponse {
        data: Confirmation { ticket_id },
    }))
}

/// POST /api/v1/gate/spot
///
/// The spot sensor reported a car settling into a spot: bind the newest
/// unresolved ticket to it.
pub async fn assign_spot(
    State(state): State<AppState>,
    Json(report): Json<SpotReport>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    let assignment = state.resolver.assign_spot(&report.spot).await?;

    Ok(Json(DataResponse { data: assignment }))
}
