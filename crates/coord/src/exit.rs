//! Paid-ticket exit workflow.
//!
//! Mirrors the entry workflow with the pending marker keyed to a concrete
//! ticket: `request_exit` finds the caller's paid ticket and claims
//! `pending/exit`; `confirm_exit` completes the ticket and opens the exit
//! barrier. The exit-claim window is enforced here, server-side: a ticket
//! paid longer ago than the window is flipped to `expired` and can no
//! longer be claimed at the gate.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use parkgate_core::barrier::BarrierKind;
use parkgate_core::error::{CoreError, CoreResult};
use parkgate_core::pending::{self, PendingExit};
use parkgate_core::protocol::{ProtocolConfig, PENDING, TICKETS};
use parkgate_core::ticket::{Ticket, TicketStatus};
use parkgate_core::types::{TicketId, UserId};
use parkgate_store::{DocumentStore, StoreExt};

use crate::entry::claim_marker;

/// Handles the exit-parking workflow.
pub struct ExitCoordinator {
    store: Arc<dyn DocumentStore>,
    config: ProtocolConfig,
}

impl ExitCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, config: ProtocolConfig) -> Self {
        Self { store, config }
    }

    /// Register a digital exit request for `user_id`'s paid ticket.
    ///
    /// The one-open-ticket invariant should make the paid ticket unique;
    /// if it is somehow violated an arbitrary paid ticket is picked.
    pub async fn request_exit(&self, user_id: &UserId) -> CoreResult<()> {
        let mine: Vec<(String, Ticket)> = self
            .store
            .query_eq_as(TICKETS, "user_id", &json!(user_id))
            .await?;
        let Some(ticket) = mine
            .into_iter()
            .map(|(_, t)| t)
            .find(|t| t.status == TicketStatus::Paid)
        else {
            return Err(CoreError::FailedPrecondition(
                "no paid ticket to exit with".into(),
            ));
        };

        let now = Utc::now();
        let paid_at = ticket.ended_at.unwrap_or(ticket.started_at);
        if pending::marker_expired(paid_at, now, self.config.exit_claim_window) {
            let ticket_id = ticket.id.clone();
            let mut expired = ticket;
            expired.status = TicketStatus::Expired;
            self.store.set_as(TICKETS, &ticket_id, &expired).await?;
            tracing::warn!(ticket_id = %expired.id, %user_id, "Paid ticket expired unclaimed");
            return Err(CoreError::Expired {
                message: "ticket was paid too long ago to open the gate; contact the operator"
                    .into(),
                deadline: pending::marker_deadline(paid_at, self.config.exit_claim_window),
            });
        }

        let marker = PendingExit {
            user_id: user_id.clone(),
            ticket_id: ticket.id.clone(),
            requested_at: now,
        };
        claim_marker(
            self.store.as_ref(),
            pending::EXIT_MARKER,
            serde_json::to_value(&marker)
                .map_err(|e| CoreError::Internal(e.to_string()))?,
            |value| {
                serde_json::from_value::<PendingExit>(value)
                    .map(|m| m.requested_at)
                    .ok()
            },
            self.config.confirmation_window,
        )
        .await?;

        tracing::info!(%user_id, ticket_id = %marker.ticket_id, "Exit requested, awaiting physical confirmation");
        Ok(())
    }

    /// Confirm a pending exit from the physical trigger.
    ///
    /// Consumes the marker, completes the referenced ticket, and opens the
    /// exit barrier. Returns the completed ticket id.
    pub async fn confirm_exit(&self) -> CoreResult<TicketId> {
        let Some(value) = self.store.get(PENDING, pending::EXIT_MARKER).await? else {
            return Err(CoreError::NotFound("no pending exit request".into()));
        };
        let marker: PendingExit = serde_json::from_value(value.clone()).map_err(|e| {
            CoreError::Internal(format!("corrupt pending exit marker: {e}"))
        })?;

        let now = Utc::now();
        if pending::marker_expired(marker.requested_at, now, self.config.confirmation_window) {
            self.store
                .compare_and_swap(PENDING, pending::EXIT_MARKER, Some(&value), None)
                .await?;
            tracing::warn!(ticket_id = %marker.ticket_id, "Exit request expired before confirmation");
            return Err(CoreError::Expired {
                message: "exit request expired before confirmation".into(),
                deadline: pending::marker_deadline(
                    marker.requested_at,
                    self.config.confirmation_window,
                ),
            });
        }

        // Consume the marker before touching the ticket. A concurrent
        // trigger that read the same marker loses this swap and reports no
        // pending request, so one marker completes at most one ticket.
        let consumed = self
            .store
            .compare_and_swap(PENDING, pending::EXIT_MARKER, Some(&value), None)
            .await?;
        if !consumed {
            return Err(CoreError::NotFound("no pending exit request".into()));
        }

        let ticket: Option<Ticket> = self.store.get_as(TICKETS, &marker.ticket_id).await?;
        match ticket {
            Some(mut t) if t.status == TicketStatus::Paid => {
                t.status = TicketStatus::Completed;
                t.ended_at = Some(now);
                self.store.set_as(TICKETS, &marker.ticket_id, &t).await?;
            }
            other => {
                // The marker pointed at a ticket that vanished or moved on.
                // It is already consumed, so the gate does not stay wedged.
                tracing::error!(
                    ticket_id = %marker.ticket_id,
                    status = ?other.map(|t| t.status),
                    "Pending exit references a ticket that is not paid"
                );
                return Err(CoreError::Internal(
                    "pending exit references a ticket that is not paid".into(),
                ));
            }
        }

        crate::open_barrier(self.store.as_ref(), BarrierKind::Exit).await?;

        tracing::info!(ticket_id = %marker.ticket_id, "Exit confirmed, ticket completed");
        Ok(marker.ticket_id)
    }
}
