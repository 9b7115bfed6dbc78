//! Simulated payment.
//!
//! No payment gateway is integrated; paying a ticket is a status flip that
//! also fixes the fare from the pure tariff. The consistency trigger frees
//! the spot when it observes the transition into `paid`.

use chrono::Utc;

use parkgate_core::error::{CoreError, CoreResult};
use parkgate_core::pricing;
use parkgate_core::protocol::TICKETS;
use parkgate_core::ticket::{Ticket, TicketStatus};
use parkgate_core::types::UserId;
use parkgate_store::{DocumentStore, StoreExt};

/// Flip the caller's active ticket to `paid`, computing the fare.
///
/// A ticket belonging to someone else reports `NotFound` rather than
/// confirming its existence.
pub async fn pay_ticket(
    store: &dyn DocumentStore,
    user_id: &UserId,
    ticket_id: &str,
) -> CoreResult<Ticket> {
    let Some(mut ticket): Option<Ticket> = store.get_as(TICKETS, ticket_id).await? else {
        return Err(CoreError::NotFound(format!("no ticket '{ticket_id}'")));
    };
    if &ticket.user_id != user_id {
        return Err(CoreError::NotFound(format!("no ticket '{ticket_id}'")));
    }
    if !ticket.status.can_transition_to(TicketStatus::Paid) {
        return Err(CoreError::FailedPrecondition(format!(
            "ticket is {}, only active tickets can be paid",
            ticket.status
        )));
    }

    let now = Utc::now();
    ticket.amount_cents = Some(pricing::amount_cents(ticket.started_at, now));
    ticket.status = TicketStatus::Paid;
    ticket.ended_at = Some(now);
    store.set_as(TICKETS, ticket_id, &ticket).await?;

    tracing::info!(
        %ticket_id,
        amount_cents = ticket.amount_cents,
        "Ticket paid"
    );
    Ok(ticket)
}
