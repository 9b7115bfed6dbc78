//! Collision-avoiding ticket-id generation.

use parkgate_core::error::CoreResult;
use parkgate_core::protocol::TICKETS;
use parkgate_core::ticket_id;
use parkgate_core::types::{TicketId, Timestamp};
use parkgate_store::DocumentStore;

/// How many random suffixes to try before falling back to the clock.
const MAX_ATTEMPTS: u32 = 10;

/// Generate a ticket id that is not present in the store.
///
/// Draws up to [`MAX_ATTEMPTS`] random suffixes, checking each against the
/// `tickets` collection; if all collide, derives the suffix from the
/// high-resolution clock. Best-effort collision avoidance, not a
/// cryptographic scheme -- practically total given the suffix space.
pub async fn generate_ticket_id(
    store: &dyn DocumentStore,
    now: Timestamp,
) -> CoreResult<TicketId> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = ticket_id::random_candidate(now);
        if store.get(TICKETS, &candidate).await?.is_none() {
            return Ok(candidate);
        }
    }

    let fallback = ticket_id::clock_candidate(now);
    tracing::warn!(
        attempts = MAX_ATTEMPTS,
        ticket_id = %fallback,
        "Random ticket-id suffixes exhausted, using clock fallback"
    );
    Ok(fallback)
}
