//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeBus`] is the fan-out hub for [`ChangeEvent`]s. The store
//! publishes into it after every committed write; the reactive rules each
//! hold their own receiver.

use tokio::sync::broadcast;

use crate::change::ChangeEvent;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out hub for document change events.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ChangeEvent`].
pub struct ChangeBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped --
    /// the store itself remains the source of truth.
    pub fn publish(&self, event: ChangeEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = ChangeBus::default();
        let mut rx = bus.subscribe();

        bus.publish(ChangeEvent::now(
            "barriers",
            "entry",
            None,
            Some(json!({"is_open": true})),
        ));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.collection, "barriers");
        assert_eq!(received.doc_id, "entry");
        assert!(received.is_create());
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = ChangeBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ChangeEvent::now("tickets", "TKT-2025-1", None, Some(json!({}))));
        bus.publish(ChangeEvent::now("tickets", "TKT-2025-2", None, Some(json!({}))));

        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(rx.recv().await.unwrap().doc_id, "TKT-2025-1");
            assert_eq!(rx.recv().await.unwrap().doc_id, "TKT-2025-2");
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = ChangeBus::default();
        bus.publish(ChangeEvent::now("lighting", "state", None, Some(json!({}))));
    }
}
