//! Sensor-driven spot assignment.
//!
//! The occupancy sensor fires asynchronously relative to barrier
//! confirmations, so there may be zero, one, or several tickets still
//! holding the unresolved sentinel when a signal arrives. In the common
//! case there is exactly one; under rapid sequential entries the newest
//! physical occupancy most plausibly belongs to the newest ticket, so the
//! latest start time wins the tie-break.

use std::sync::Arc;

use serde_json::json;

use parkgate_core::error::{CoreError, CoreResult};
use parkgate_core::protocol::{SPOTS, TICKETS};
use parkgate_core::spot::{normalize_spot_id, ParkingSpot};
use parkgate_core::ticket::{Ticket, UNRESOLVED_SPOT};
use parkgate_core::types::{SpotId, TicketId};
use parkgate_store::{DocumentStore, StoreExt};

/// Result of binding a sensor signal to a ticket.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Assignment {
    pub ticket_id: TicketId,
    pub spot_id: SpotId,
}

/// Binds occupancy sensor signals to unresolved tickets.
pub struct SpotResolver {
    store: Arc<dyn DocumentStore>,
}

impl SpotResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Resolve a raw sensor identifier to a spot and bind it to the most
    /// recently started unresolved ticket.
    ///
    /// The ticket's spot field is mutated exactly once in its lifetime --
    /// here. The spot is marked occupied and assigned to the ticket's
    /// owner in the same operation, independently of the consistency
    /// trigger (which skips sentinel-spotted tickets).
    pub async fn assign_spot(&self, raw: &str) -> CoreResult<Assignment> {
        let spot_id = normalize_spot_id(raw)?;

        let Some(mut spot): Option<ParkingSpot> = self.store.get_as(SPOTS, &spot_id).await?
        else {
            return Err(CoreError::NotFound(format!("unknown spot '{spot_id}'")));
        };

        let unresolved: Vec<(String, Ticket)> = self
            .store
            .query_eq_as(TICKETS, "spot_id", &json!(UNRESOLVED_SPOT))
            .await?;
        let Some(mut ticket) = unresolved
            .into_iter()
            .map(|(_, t)| t)
            .max_by_key(|t| t.started_at)
        else {
            return Err(CoreError::NotFound("no ticket awaiting a spot".into()));
        };

        ticket.spot_id = spot_id.clone();
        let ticket_id = ticket.id.clone();
        self.store.set_as(TICKETS, &ticket_id, &ticket).await?;

        spot.occupied = true;
        spot.assigned_user = Some(ticket.user_id.clone());
        self.store.set_as(SPOTS, &spot_id, &spot).await?;

        tracing::info!(%ticket_id, %spot_id, "Spot bound to ticket");
        Ok(Assignment { ticket_id, spot_id })
    }
}
