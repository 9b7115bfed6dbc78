//! Shared setup for coordinator integration tests.

use std::sync::Arc;

use parkgate_coord::{EntryCoordinator, ExitCoordinator, SpotResolver};
use parkgate_core::protocol::ProtocolConfig;
use parkgate_store::{seed::seed_lot, DocumentStore, MemoryStore};

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub entry: EntryCoordinator,
    pub exit: ExitCoordinator,
    pub resolver: SpotResolver,
}

/// A seeded in-memory lot with coordinators on default protocol timing.
pub async fn harness(spot_count: u32) -> Harness {
    let store = Arc::new(MemoryStore::new());
    seed_lot(store.as_ref(), spot_count).await.unwrap();

    let dyn_store: Arc<dyn DocumentStore> = store.clone();
    Harness {
        store: store.clone(),
        entry: EntryCoordinator::new(dyn_store.clone(), ProtocolConfig::default()),
        exit: ExitCoordinator::new(dyn_store.clone(), ProtocolConfig::default()),
        resolver: SpotResolver::new(dyn_store),
    }
}
