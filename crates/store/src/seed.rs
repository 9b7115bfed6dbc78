//! Initial lot layout.
//!
//! Idempotent: existing documents are left untouched, so a restart never
//! resets occupancy or barrier state.

use chrono::{Timelike, Utc};

use parkgate_core::barrier::{Barrier, BarrierKind};
use parkgate_core::error::CoreResult;
use parkgate_core::lighting::{self, Lighting};
use parkgate_core::protocol::{BARRIERS, LIGHTING, SPOTS};
use parkgate_core::spot::ParkingSpot;

use crate::{DocumentStore, StoreError};

/// Create the lot's documents: `spot_count` free spots, two closed
/// barriers, and the lighting state. Existing documents are preserved.
pub async fn seed_lot(store: &dyn DocumentStore, spot_count: u32) -> CoreResult<()> {
    for number in 1..=spot_count {
        let spot = ParkingSpot::free(number);
        let id = spot.id.clone();
        create_if_absent(store, SPOTS, &id, &spot).await?;
    }

    for kind in [BarrierKind::Entry, BarrierKind::Exit] {
        let barrier = Barrier::closed(kind);
        create_if_absent(store, BARRIERS, kind.doc_id(), &barrier).await?;
    }

    let now = Utc::now();
    let state = Lighting {
        on: lighting::lights_on_at_hour(now.hour()),
        updated_at: now,
    };
    create_if_absent(store, LIGHTING, lighting::STATE_DOC, &state).await?;

    tracing::info!(spot_count, "Lot documents seeded");
    Ok(())
}

async fn create_if_absent<T: serde::Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    doc_id: &str,
    doc: &T,
) -> CoreResult<()> {
    let value = serde_json::to_value(doc)
        .map_err(|e| parkgate_core::error::CoreError::Internal(e.to_string()))?;
    match store.create(collection, doc_id, value).await {
        Ok(()) => Ok(()),
        Err(StoreError::AlreadyExists { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
