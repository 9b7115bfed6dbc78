//! Single-slot pending-confirmation markers.
//!
//! A marker is written when a user makes a digital request and is consumed
//! by the matching physical confirmation, or reclaimed once its
//! confirmation window has elapsed. Only one marker of each kind exists at
//! a time (`pending/entry`, `pending/exit`) -- the system models a single
//! physical gate with a single button.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{TicketId, Timestamp, UserId};

/// Document id of the entry marker within the `pending` collection.
pub const ENTRY_MARKER: &str = "entry";
/// Document id of the exit marker within the `pending` collection.
pub const EXIT_MARKER: &str = "exit";

/// "Digital entry request made, awaiting physical confirmation."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEntry {
    pub user_id: UserId,
    pub requested_at: Timestamp,
}

/// "Digital exit request made for a paid ticket, awaiting confirmation."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingExit {
    pub user_id: UserId,
    pub ticket_id: TicketId,
    pub requested_at: Timestamp,
}

/// Whether a marker requested at `requested_at` has outlived `window`.
pub fn marker_expired(requested_at: Timestamp, now: Timestamp, window: Duration) -> bool {
    let age = now.signed_duration_since(requested_at);
    age > chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX)
}

/// The instant a marker stops being confirmable.
pub fn marker_deadline(requested_at: Timestamp, window: Duration) -> Timestamp {
    requested_at + chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn fresh_marker_is_not_expired() {
        let now = Utc::now();
        assert!(!marker_expired(now, now, Duration::from_secs(60)));
        assert!(!marker_expired(
            now - chrono::Duration::seconds(59),
            now,
            Duration::from_secs(60)
        ));
    }

    #[test]
    fn old_marker_is_expired() {
        let now = Utc::now();
        assert!(marker_expired(
            now - chrono::Duration::seconds(61),
            now,
            Duration::from_secs(60)
        ));
    }

    #[test]
    fn deadline_is_request_plus_window() {
        let at = Utc::now();
        let deadline = marker_deadline(at, Duration::from_secs(60));
        assert_eq!(deadline - at, chrono::Duration::seconds(60));
    }
}
