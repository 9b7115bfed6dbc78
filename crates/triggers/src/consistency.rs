//! Spot/ticket consistency.
//!
//! Keeps spot occupancy flags synchronized with ticket status transitions:
//! a ticket entering `active` occupies its spot, a ticket leaving the open
//! states (`active` → `paid`/`completed`) frees it. Only status *changes*
//! crossing those boundaries act; re-writes of the same status are no-ops,
//! and the unresolved sentinel is never looked up as a spot.

use std::sync::Arc;

use tokio::sync::broadcast;

use parkgate_core::error::CoreResult;
use parkgate_core::protocol::{SPOTS, TICKETS};
use parkgate_core::spot::ParkingSpot;
use parkgate_core::ticket::{Ticket, TicketStatus};
use parkgate_events::ChangeEvent;
use parkgate_store::{DocumentStore, StoreExt};

use crate::retry::set_with_retry;

/// Reacts to every ticket write, keeping spot state aligned.
pub struct ConsistencyTrigger {
    store: Arc<dyn DocumentStore>,
}

impl ConsistencyTrigger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Run the consumer loop until the change bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<ChangeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if event.collection != TICKETS {
                        continue;
                    }
                    if let Err(e) = self.sync_spot(&event).await {
                        tracing::error!(
                            error = %e,
                            doc_id = %event.doc_id,
                            "Spot sync failed; spot state may be stale"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Consistency trigger lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Change bus closed, consistency trigger shutting down");
                    break;
                }
            }
        }
    }

    /// Apply one ticket change to its spot, if the change crosses an
    /// occupancy boundary.
    async fn sync_spot(&self, event: &ChangeEvent) -> CoreResult<()> {
        // Tickets are never deleted in normal operation; ignore if so.
        let Some(after) = event.decode_after::<Ticket>() else {
            return Ok(());
        };
        let before_status = event.decode_before::<Ticket>().map(|t| t.status);

        let entered_active =
            after.status == TicketStatus::Active && before_status != Some(TicketStatus::Active);
        let left_open = matches!(after.status, TicketStatus::Paid | TicketStatus::Completed)
            && !matches!(
                before_status,
                Some(TicketStatus::Paid) | Some(TicketStatus::Completed)
            );
        if !entered_active && !left_open {
            return Ok(());
        }

        // The sentinel is not a spot reference; the resolver occupies the
        // spot itself once the sensor reports one.
        if after.spot_unresolved() {
            return Ok(());
        }

        let Some(mut spot): Option<ParkingSpot> =
            self.store.get_as(SPOTS, &after.spot_id).await?
        else {
            tracing::warn!(spot_id = %after.spot_id, ticket_id = %after.id, "Ticket references unknown spot");
            return Ok(());
        };

        let (occupied, assigned_user) = if entered_active {
            (true, Some(after.user_id.clone()))
        } else {
            (false, None)
        };
        if spot.occupied == occupied && spot.assigned_user == assigned_user {
            // Re-observed write; spot already aligned.
            return Ok(());
        }

        spot.occupied = occupied;
        spot.assigned_user = assigned_user;
        let value = serde_json::to_value(&spot)
            .map_err(|e| parkgate_core::error::CoreError::Internal(e.to_string()))?;
        set_with_retry(self.store.as_ref(), SPOTS, &after.spot_id, value).await?;

        tracing::info!(
            spot_id = %after.spot_id,
            ticket_id = %after.id,
            occupied,
            "Spot state synchronized with ticket transition"
        );
        Ok(())
    }
}
