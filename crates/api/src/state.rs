use std::sync::Arc;

use parkgate_coord::{EntryCoordinator, ExitCoordinator, SpotResolver};
use parkgate_store::DocumentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The shared document store.
    pub store: Arc<dyn DocumentStore>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Entry-side request/confirm coordinator.
    pub entry: Arc<EntryCoordinator>,
    /// Exit-side request/confirm coordinator.
    pub exit: Arc<ExitCoordinator>,
    /// Spot sensor assignment resolver.
    pub resolver: Arc<SpotResolver>,
}
