//! Barrier safety closer.
//!
//! Whatever opens a barrier, it must not stay open: a fixed delay after any
//! closed→open transition the closer unconditionally writes it shut. An
//! open→open re-write does not arm a second timer, so a redundant write
//! cannot extend the open period. If this process dies between arming and
//! closing, the barrier stays open until an operator intervenes -- the
//! on-site attendant is the backstop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use parkgate_core::barrier::Barrier;
use parkgate_core::protocol::BARRIERS;
use parkgate_events::ChangeEvent;
use parkgate_store::{DocumentStore, StoreExt};

use crate::retry::set_with_retry;

/// Force-closes barriers a fixed delay after they open.
pub struct BarrierCloser {
    store: Arc<dyn DocumentStore>,
    delay: Duration,
}

impl BarrierCloser {
    pub fn new(store: Arc<dyn DocumentStore>, delay: Duration) -> Self {
        Self { store, delay }
    }

    /// Run the consumer loop until the change bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<ChangeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.maybe_arm(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Barrier closer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Change bus closed, barrier closer shutting down");
                    break;
                }
            }
        }
    }

    /// Arm a delayed close on a closed→open transition.
    fn maybe_arm(&self, event: &ChangeEvent) {
        if event.collection != BARRIERS {
            return;
        }
        let Some(after) = event.decode_after::<Barrier>() else {
            return;
        };
        let was_open = event
            .decode_before::<Barrier>()
            .map(|b| b.is_open)
            .unwrap_or(false);
        if !after.is_open || was_open {
            return;
        }

        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let doc_id = event.doc_id.clone();
        tracing::debug!(barrier = %doc_id, delay_secs = delay.as_secs(), "Safety close armed");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = close_barrier(store.as_ref(), &doc_id).await {
                tracing::error!(barrier = %doc_id, error = %e, "Safety close failed; barrier may be stuck open");
            }
        });
    }
}

/// Write the barrier shut, keeping `opened_at` as a historical stamp.
async fn close_barrier(store: &dyn DocumentStore, doc_id: &str) -> parkgate_core::error::CoreResult<()> {
    let Some(mut barrier): Option<Barrier> = store.get_as(BARRIERS, doc_id).await? else {
        return Ok(());
    };
    if !barrier.is_open {
        return Ok(());
    }
    barrier.is_open = false;
    let value = serde_json::to_value(&barrier)
        .map_err(|e| parkgate_core::error::CoreError::Internal(e.to_string()))?;
    set_with_retry(store, BARRIERS, doc_id, value).await?;
    tracing::info!(barrier = %doc_id, "Barrier force-closed");
    Ok(())
}
