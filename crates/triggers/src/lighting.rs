//! Scheduled lighting toggle.
//!
//! Flips the lot lighting flag by time of day. Writes only on an actual
//! change so the change stream is not flooded with identical documents.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Timelike, Utc};
use tokio_util::sync::CancellationToken;

use parkgate_core::lighting::{lights_on_at_hour, Lighting, STATE_DOC};
use parkgate_core::protocol::LIGHTING;
use parkgate_store::{DocumentStore, StoreExt};

/// How often the schedule re-evaluates the flag.
const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Periodic time-of-day lighting control.
pub struct LightingSchedule {
    store: Arc<dyn DocumentStore>,
}

impl LightingSchedule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Run the toggle loop until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(CHECK_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Lighting schedule stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.apply().await {
                        tracing::error!(error = %e, "Lighting toggle failed");
                    }
                }
            }
        }
    }

    /// Write the flag for the current hour, if it changed.
    async fn apply(&self) -> parkgate_core::error::CoreResult<()> {
        let now = Utc::now();
        let desired = lights_on_at_hour(now.hour());

        let current: Option<Lighting> = self.store.get_as(LIGHTING, STATE_DOC).await?;
        if current.as_ref().map(|l| l.on) == Some(desired) {
            return Ok(());
        }

        let state = Lighting {
            on: desired,
            updated_at: now,
        };
        self.store.set_as(LIGHTING, STATE_DOC, &state).await?;
        tracing::info!(on = desired, "Lighting toggled");
        Ok(())
    }
}
