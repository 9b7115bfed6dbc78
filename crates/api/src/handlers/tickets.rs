//! Ticket read and payment handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use parkgate_core::error::CoreError;
use parkgate_core::protocol::TICKETS;
use parkgate_core::ticket::Ticket;
use parkgate_coord::payment;
use parkgate_store::StoreExt;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tickets
///
/// List the caller's tickets, newest first.
pub async fn list_tickets(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let rows: Vec<(String, Ticket)> = state
        .store
        .query_eq_as(TICKETS, "user_id", &json!(user.user_id))
        .await?;

    let mut tickets: Vec<Ticket> = rows.into_iter().map(|(_, t)| t).collect();
    tickets.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/{id}
///
/// Fetch one of the caller's tickets. Someone else's ticket reports
/// not-found rather than confirming its existence.
pub async fn get_ticket(
    user: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket: Option<Ticket> = state.store.get_as(TICKETS, &ticket_id).await?;

    match ticket {
        Some(t) if t.user_id == user.user_id => Ok(Json(DataResponse { data: t })),
        _ => Err(CoreError::NotFound(format!("no ticket '{ticket_id}'")).into()),
    }
}

/// POST /api/v1/tickets/{id}/pay
///
/// Simulated payment: computes the fare and flips the ticket to `paid`.
pub async fn pay_ticket(
    user: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = payment::pay_ticket(state.store.as_ref(), &user.user_id, &ticket_id).await?;

    tracing::info!(
        user_id = %user.user_id,
        ticket_id = %ticket.id,
        amount_cents = ticket.amount_cents,
        "Ticket paid"
    );

    Ok(Json(DataResponse { data: ticket }))
}
