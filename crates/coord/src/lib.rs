//! Gate coordination.
//!
//! The entry and exit workflows are two-factor: a digital request from the
//! app claims a single-slot pending marker, and a physical trigger at the
//! gate must confirm it within the confirmation window. Confirmation
//! creates (or completes) the ticket and opens the matching barrier; the
//! spot resolver later binds a concrete spot to a freshly created ticket
//! when the occupancy sensor fires.
//!
//! Every operation here is a short-lived, stateless unit over the shared
//! [`DocumentStore`] -- concurrency safety comes from the store's serialized
//! document writes and the compare-and-swap marker claim, not from any
//! in-process locking.

pub mod entry;
pub mod exit;
pub mod payment;
pub mod spot;
pub mod ticket_id;

pub use entry::EntryCoordinator;
pub use exit::ExitCoordinator;
pub use spot::{Assignment, SpotResolver};

use chrono::Utc;

use parkgate_core::barrier::{Barrier, BarrierKind};
use parkgate_core::error::CoreResult;
use parkgate_core::protocol::BARRIERS;
use parkgate_store::{DocumentStore, StoreExt};

/// Open a barrier, stamping `opened_at`.
///
/// The safety closer reacts to the resulting change event; nothing here
/// waits for the barrier to close again.
pub(crate) async fn open_barrier(store: &dyn DocumentStore, kind: BarrierKind) -> CoreResult<()> {
    let mut barrier: Barrier = store
        .get_as(BARRIERS, kind.doc_id())
        .await?
        .unwrap_or_else(|| Barrier::closed(kind));
    barrier.open(Utc::now());
    store.set_as(BARRIERS, kind.doc_id(), &barrier).await?;
    tracing::info!(barrier = %kind, "Barrier opened");
    Ok(())
}
