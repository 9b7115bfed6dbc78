//! Shared state store abstraction.
//!
//! The coordination protocol communicates exclusively through a document
//! database: point reads and writes by `collection/doc_id` path,
//! field-equality queries, and a change-notification stream. This crate
//! defines that contract as the object-safe [`DocumentStore`] trait, typed
//! convenience helpers in [`StoreExt`], the bundled in-memory
//! implementation [`MemoryStore`], and the [`seed`] routine that lays out
//! the lot's initial documents.
//!
//! Individual document writes are serialized; there are no cross-document
//! transactions. The one stronger primitive is
//! [`compare_and_swap`](DocumentStore::compare_and_swap), which the
//! coordinators use to claim the single-slot pending markers.

pub mod memory;
pub mod seed;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use parkgate_core::error::{CoreError, CoreResult};
use parkgate_events::ChangeEvent;

pub use memory::MemoryStore;

/// Errors from the storage backend itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{doc_id} already exists")]
    AlreadyExists { collection: String, doc_id: String },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { collection, doc_id } => {
                CoreError::FailedPrecondition(format!("{collection}/{doc_id} already exists"))
            }
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/// The document database contract consumed by coordinators and triggers.
///
/// Object-safe so components can hold an `Arc<dyn DocumentStore>`; typed
/// access goes through [`StoreExt`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read. `Ok(None)` when the document does not exist.
    async fn get(&self, collection: &str, doc_id: &str) -> StoreResult<Option<Value>>;

    /// Unconditional write (create or overwrite).
    async fn set(&self, collection: &str, doc_id: &str, value: Value) -> StoreResult<()>;

    /// Create-only write; fails with [`StoreError::AlreadyExists`] if the
    /// document is present.
    async fn create(&self, collection: &str, doc_id: &str, value: Value) -> StoreResult<()>;

    /// Full-document compare-and-swap.
    ///
    /// Writes `new` (or deletes, when `new` is `None`) only if the current
    /// document equals `expected` (`None` = must be absent). Returns
    /// whether the swap happened; a lost race is `Ok(false)`, not an error.
    async fn compare_and_swap(
        &self,
        collection: &str,
        doc_id: &str,
        expected: Option<&Value>,
        new: Option<Value>,
    ) -> StoreResult<bool>;

    /// Delete. Returns whether the document existed.
    async fn delete(&self, collection: &str, doc_id: &str) -> StoreResult<bool>;

    /// All documents of a collection, ordered by document id.
    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>>;

    /// Documents of a collection whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(String, Value)>>;

    /// Subscribe to the change stream of every committed mutation.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> StoreResult<()>;
}

/// Typed access on top of [`DocumentStore`].
///
/// Decode failures mean a corrupt document and surface as
/// [`CoreError::Internal`].
#[async_trait]
pub trait StoreExt: DocumentStore {
    /// Point read decoded into `T`.
    async fn get_as<T>(&self, collection: &str, doc_id: &str) -> CoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get(collection, doc_id).await? {
            None => Ok(None),
            Some(value) => Ok(Some(decode(collection, doc_id, value)?)),
        }
    }

    /// Unconditional typed write.
    async fn set_as<T>(&self, collection: &str, doc_id: &str, doc: &T) -> CoreResult<()>
    where
        T: Serialize + Sync,
    {
        let value = encode(collection, doc_id, doc)?;
        self.set(collection, doc_id, value).await?;
        Ok(())
    }

    /// Create-only typed write.
    async fn create_as<T>(&self, collection: &str, doc_id: &str, doc: &T) -> CoreResult<()>
    where
        T: Serialize + Sync,
    {
        let value = encode(collection, doc_id, doc)?;
        self.create(collection, doc_id, value).await?;
        Ok(())
    }

    /// Field-equality query decoded into `T`.
    async fn query_eq_as<T>(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> CoreResult<Vec<(String, T)>>
    where
        T: DeserializeOwned,
    {
        let rows = self.query_eq(collection, field, value).await?;
        rows.into_iter()
            .map(|(id, v)| {
                let doc = decode(collection, &id, v)?;
                Ok((id, doc))
            })
            .collect()
    }
}

impl<S: DocumentStore + ?Sized> StoreExt for S {}

fn decode<T: DeserializeOwned>(collection: &str, doc_id: &str, value: Value) -> CoreResult<T> {
    serde_json::from_value(value).map_err(|e| {
        CoreError::Internal(format!("corrupt document {collection}/{doc_id}: {e}"))
    })
}

fn encode<T: Serialize>(collection: &str, doc_id: &str, doc: &T) -> CoreResult<Value> {
    serde_json::to_value(doc).map_err(|e| {
        CoreError::Internal(format!("unserializable document {collection}/{doc_id}: {e}"))
    })
}
