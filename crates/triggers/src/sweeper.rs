//! Stale pending-marker sweeper.
//!
//! Lazy expiry at confirmation time is the authoritative check, but a
//! request nobody ever confirms would otherwise leave its marker in place
//! until the next requester reclaims it. The sweeper deletes markers past
//! their confirmation window on a fixed interval. Deletion is a
//! compare-and-swap so a marker freshly claimed between read and delete is
//! never lost.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use parkgate_core::pending::{marker_expired, ENTRY_MARKER, EXIT_MARKER};
use parkgate_core::protocol::PENDING;
use parkgate_core::types::Timestamp;
use parkgate_store::DocumentStore;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Periodically reclaims expired pending markers.
pub struct MarkerSweeper {
    store: Arc<dyn DocumentStore>,
    window: Duration,
}

impl MarkerSweeper {
    pub fn new(store: Arc<dyn DocumentStore>, window: Duration) -> Self {
        Self { store, window }
    }

    /// Run the sweep loop until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = SWEEP_INTERVAL.as_secs(),
            window_secs = self.window.as_secs(),
            "Marker sweeper started"
        );

        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Marker sweeper stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    /// One pass over both marker slots.
    async fn sweep(&self) {
        for marker_id in [ENTRY_MARKER, EXIT_MARKER] {
            if let Err(e) = self.sweep_marker(marker_id).await {
                tracing::error!(marker = marker_id, error = %e, "Marker sweep failed");
            }
        }
    }

    async fn sweep_marker(
        &self,
        marker_id: &str,
    ) -> Result<(), parkgate_store::StoreError> {
        let Some(current) = self.store.get(PENDING, marker_id).await? else {
            return Ok(());
        };

        // Both marker kinds carry `requested_at`; a marker without one is
        // corrupt and equally reclaimable.
        let requested_at = current
            .get("requested_at")
            .cloned()
            .and_then(|v| serde_json::from_value::<Timestamp>(v).ok());
        let stale = match requested_at {
            Some(at) => marker_expired(at, Utc::now(), self.window),
            None => true,
        };
        if !stale {
            return Ok(());
        }

        let removed = self
            .store
            .compare_and_swap(PENDING, marker_id, Some(&current), None)
            .await?;
        if removed {
            tracing::info!(marker = marker_id, "Swept expired pending marker");
        }
        Ok(())
    }
}
