//! Enter-parking workflow.
//!
//! `request_entry` runs the fast preconditions (no open ticket, free
//! capacity) at digital-request time so the user gets feedback before
//! walking to the gate, then claims the `pending/entry` marker with a
//! compare-and-swap. `confirm_entry` is invoked by the physical trigger,
//! carries no caller identity, and turns a live marker into a ticket plus
//! an open entry barrier.
//!
//! State machine: `NoPending → Pending → Confirmed | Expired`. Expiry is
//! detected lazily at confirmation time (and by the background sweeper); a
//! stale marker only blocks new requests, it never corrupts ticket state.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use parkgate_core::barrier::BarrierKind;
use parkgate_core::error::{CoreError, CoreResult};
use parkgate_core::pending::{self, PendingEntry};
use parkgate_core::protocol::{ProtocolConfig, PENDING, SPOTS, TICKETS};
use parkgate_core::ticket::Ticket;
use parkgate_core::types::{TicketId, UserId};
use parkgate_store::{DocumentStore, StoreExt};

use crate::ticket_id::generate_ticket_id;

/// Handles the enter-parking workflow.
pub struct EntryCoordinator {
    store: Arc<dyn DocumentStore>,
    config: ProtocolConfig,
}

impl EntryCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, config: ProtocolConfig) -> Self {
        Self { store, config }
    }

    /// Register a digital entry request for `user_id`.
    ///
    /// Preconditions, checked optimistically against the store:
    /// - the user has no open (`active` or `paid`) ticket,
    /// - at least one spot is free,
    /// - no other requester currently holds an unexpired confirmation
    ///   window (the marker claim is a compare-and-swap, so two
    ///   simultaneous requests cannot overwrite each other).
    pub async fn request_entry(&self, user_id: &UserId) -> CoreResult<()> {
        let mine: Vec<(String, Ticket)> = self
            .store
            .query_eq_as(TICKETS, "user_id", &json!(user_id))
            .await?;
        if mine.iter().any(|(_, t)| t.status.is_open()) {
            return Err(CoreError::FailedPrecondition(
                "you already have an open ticket".into(),
            ));
        }

        let free = self.store.query_eq(SPOTS, "occupied", &json!(false)).await?;
        if free.is_empty() {
            return Err(CoreError::FailedPrecondition(
                "no free spots available".into(),
            ));
        }

        let now = Utc::now();
        let marker = PendingEntry {
            user_id: user_id.clone(),
            requested_at: now,
        };
        claim_marker(
            self.store.as_ref(),
            pending::ENTRY_MARKER,
            serde_json::to_value(&marker)
                .map_err(|e| CoreError::Internal(e.to_string()))?,
            |value| {
                serde_json::from_value::<PendingEntry>(value)
                    .map(|m| m.requested_at)
                    .ok()
            },
            self.config.confirmation_window,
        )
        .await?;

        tracing::info!(%user_id, "Entry requested, awaiting physical confirmation");
        Ok(())
    }

    /// Confirm a pending entry from the physical trigger.
    ///
    /// Consumes the marker, creates the ticket (active, spot unresolved),
    /// and opens the entry barrier. Returns the new ticket id.
    pub async fn confirm_entry(&self) -> CoreResult<TicketId> {
        let Some(value) = self.store.get(PENDING, pending::ENTRY_MARKER).await? else {
            return Err(CoreError::NotFound("no pending entry request".into()));
        };
        let marker: PendingEntry = serde_json::from_value(value.clone()).map_err(|e| {
            CoreError::Internal(format!("corrupt pending entry marker: {e}"))
        })?;

        let now = Utc::now();
        if pending::marker_expired(marker.requested_at, now, self.config.confirmation_window) {
            self.store
                .compare_and_swap(PENDING, pending::ENTRY_MARKER, Some(&value), None)
                .await?;
            tracing::warn!(user_id = %marker.user_id, "Entry request expired before confirmation");
            return Err(CoreError::Expired {
                message: "entry request expired before confirmation".into(),
                deadline: pending::marker_deadline(
                    marker.requested_at,
                    self.config.confirmation_window,
                ),
            });
        }

        // Consume the marker before any ticket work. A concurrent trigger
        // that read the same marker loses this swap and reports no pending
        // request, so one marker yields at most one ticket.
        let consumed = self
            .store
            .compare_and_swap(PENDING, pending::ENTRY_MARKER, Some(&value), None)
            .await?;
        if !consumed {
            return Err(CoreError::NotFound("no pending entry request".into()));
        }

        let ticket_id = generate_ticket_id(self.store.as_ref(), now).await?;
        let ticket = Ticket::new(ticket_id.clone(), marker.user_id.clone(), now);
        self.store.create_as(TICKETS, &ticket_id, &ticket).await?;

        crate::open_barrier(self.store.as_ref(), BarrierKind::Entry).await?;

        tracing::info!(%ticket_id, user_id = %marker.user_id, "Entry confirmed, ticket created");
        Ok(ticket_id)
    }
}

/// Claim a single-slot pending marker via compare-and-swap.
///
/// The slot is claimable when it is empty, or when the current occupant's
/// window has elapsed (an abandoned request must not wedge the gate). A
/// corrupt occupant counts as abandoned. Used by both coordinators.
pub(crate) async fn claim_marker(
    store: &dyn DocumentStore,
    marker_id: &str,
    new: serde_json::Value,
    requested_at_of: impl Fn(serde_json::Value) -> Option<parkgate_core::types::Timestamp>,
    window: std::time::Duration,
) -> CoreResult<()> {
    let now = Utc::now();
    let current = store.get(PENDING, marker_id).await?;

    let claimable = match &current {
        None => true,
        Some(value) => match requested_at_of(value.clone()) {
            Some(requested_at) => pending::marker_expired(requested_at, now, window),
            None => true,
        },
    };
    if !claimable {
        return Err(CoreError::FailedPrecondition(
            "another confirmation window is already open for this gate".into(),
        ));
    }

    let swapped = store
        .compare_and_swap(PENDING, marker_id, current.as_ref(), Some(new))
        .await?;
    if !swapped {
        // Someone else claimed the slot between our read and the swap.
        return Err(CoreError::FailedPrecondition(
            "another confirmation window is already open for this gate".into(),
        ));
    }
    Ok(())
}
