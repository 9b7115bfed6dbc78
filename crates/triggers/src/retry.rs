//! Bounded retry for reactive writes.
//!
//! A missed spot-sync or missed auto-close directly corrupts the
//! physical/digital alignment, so the reactive rules retry their store
//! writes a few times before giving up and logging.

use std::time::Duration;

use serde_json::Value;

use parkgate_core::error::CoreResult;
use parkgate_store::DocumentStore;

/// Attempts per write, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff; grows linearly with the attempt number.
const BACKOFF: Duration = Duration::from_millis(100);

/// `store.set` with bounded retry and linear backoff.
pub async fn set_with_retry(
    store: &dyn DocumentStore,
    collection: &str,
    doc_id: &str,
    value: Value,
) -> CoreResult<()> {
    let mut attempt = 1;
    loop {
        match store.set(collection, doc_id, value.clone()).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    collection,
                    doc_id,
                    attempt,
                    error = %e,
                    "Reactive write failed, retrying"
                );
                tokio::time::sleep(BACKOFF * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
