//! The change-event envelope.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A committed mutation of one document.
///
/// `before`/`after` carry the raw document values: creation has no
/// `before`, deletion has no `after`. Consumers decode whichever side they
/// care about with [`decode_before`](ChangeEvent::decode_before) /
/// [`decode_after`](ChangeEvent::decode_after) and must tolerate documents
/// of other shapes sharing the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub doc_id: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    /// When the write committed (UTC).
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Build an event for a write committed now.
    pub fn now(
        collection: impl Into<String>,
        doc_id: impl Into<String>,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        Self {
            collection: collection.into(),
            doc_id: doc_id.into(),
            before,
            after,
            at: Utc::now(),
        }
    }

    /// True when the document did not exist before this write.
    pub fn is_create(&self) -> bool {
        self.before.is_none() && self.after.is_some()
    }

    /// True when the document no longer exists after this write.
    pub fn is_delete(&self) -> bool {
        self.after.is_none()
    }

    /// Decode the pre-image, ignoring shape mismatches.
    pub fn decode_before<T: DeserializeOwned>(&self) -> Option<T> {
        self.before
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Decode the post-image, ignoring shape mismatches.
    pub fn decode_after<T: DeserializeOwned>(&self) -> Option<T> {
        self.after
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_and_delete_classification() {
        let create = ChangeEvent::now("tickets", "TKT-2025-1", None, Some(json!({"a": 1})));
        assert!(create.is_create());
        assert!(!create.is_delete());

        let delete = ChangeEvent::now("pending", "entry", Some(json!({"a": 1})), None);
        assert!(delete.is_delete());
        assert!(!delete.is_create());
    }

    #[test]
    fn decode_tolerates_shape_mismatch() {
        #[derive(serde::Deserialize)]
        struct Shaped {
            #[allow(dead_code)]
            n: i64,
        }

        let ev = ChangeEvent::now("spots", "spot1", None, Some(json!({"other": true})));
        assert!(ev.decode_after::<Shaped>().is_none());

        let ev = ChangeEvent::now("spots", "spot1", None, Some(json!({"n": 3})));
        assert!(ev.decode_after::<Shaped>().is_some());
    }
}
