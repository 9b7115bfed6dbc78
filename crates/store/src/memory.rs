//! In-memory document store.
//!
//! Backs the single-gate deployment and every test. A `tokio::sync::RwLock`
//! over nested maps serializes individual document writes; change events
//! are published while the write lock is held so the stream order matches
//! commit order.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use parkgate_events::{ChangeBus, ChangeEvent};

use crate::{DocumentStore, StoreError, StoreResult};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory [`DocumentStore`] with change notifications.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    bus: ChangeBus,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, doc_id: &str) -> StoreResult<Option<Value>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(collection)
            .and_then(|docs| docs.get(doc_id))
            .cloned())
    }

    async fn set(&self, collection: &str, doc_id: &str, value: Value) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let docs = inner.entry(collection.to_string()).or_default();
        let before = docs.insert(doc_id.to_string(), value.clone());
        self.bus
            .publish(ChangeEvent::now(collection, doc_id, before, Some(value)));
        Ok(())
    }

    async fn create(&self, collection: &str, doc_id: &str, value: Value) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let docs = inner.entry(collection.to_string()).or_default();
        if docs.contains_key(doc_id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                doc_id: doc_id.to_string(),
            });
        }
        docs.insert(doc_id.to_string(), value.clone());
        self.bus
            .publish(ChangeEvent::now(collection, doc_id, None, Some(value)));
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        collection: &str,
        doc_id: &str,
        expected: Option<&Value>,
        new: Option<Value>,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let docs = inner.entry(collection.to_string()).or_default();
        let current = docs.get(doc_id);
        if current != expected {
            return Ok(false);
        }

        let before = match &new {
            Some(value) => docs.insert(doc_id.to_string(), value.clone()),
            None => docs.remove(doc_id),
        };
        // A no-op swap (absent -> delete) publishes nothing.
        if before.is_none() && new.is_none() {
            return Ok(true);
        }
        self.bus
            .publish(ChangeEvent::now(collection, doc_id, before, new));
        Ok(true)
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(docs) = inner.get_mut(collection) else {
            return Ok(false);
        };
        match docs.remove(doc_id) {
            None => Ok(false),
            Some(before) => {
                self.bus
                    .publish(ChangeEvent::now(collection, doc_id, Some(before), None));
                Ok(true)
            }
        }
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, v)| (id.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(String, Value)>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.bus.subscribe()
    }

    async fn ping(&self) -> StoreResult<()> {
        let _ = self.inner.read().await;
        Ok(())
    }
}
