//! The parking ticket document and its status state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{SpotId, TicketId, Timestamp, UserId};

/// Placeholder spot value for a ticket whose physical spot has not been
/// determined yet. Not a valid spot reference; the consistency trigger and
/// the resolver both treat it specially.
pub const UNRESOLVED_SPOT: &str = "unassigned";

/// Lifecycle states of a ticket.
///
/// `active → paid → completed` is the happy path; `paid → expired` happens
/// when a paid ticket is not claimed at the exit gate within the claim
/// window. Tickets are never deleted in normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Paid,
    Completed,
    Expired,
}

impl TicketStatus {
    /// Whether `self → next` is a legal lifecycle transition.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!((self, next), (Active, Paid) | (Paid, Completed) | (Paid, Expired))
    }

    /// A ticket in this state keeps its spot occupied.
    pub fn holds_spot(self) -> bool {
        matches!(self, TicketStatus::Active)
    }

    /// An open ticket is still inside the lot lifecycle. Each user may hold
    /// at most one; a new entry request against an open ticket is refused.
    pub fn is_open(self) -> bool {
        matches!(self, TicketStatus::Active | TicketStatus::Paid)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketStatus::Active => "active",
            TicketStatus::Paid => "paid",
            TicketStatus::Completed => "completed",
            TicketStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// One parking session from entry confirmation to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Human-meaningful identifier, `TKT-{year}-{suffix}`.
    pub id: TicketId,
    /// Owning user (external identity provider id).
    pub user_id: UserId,
    /// Assigned spot, or [`UNRESOLVED_SPOT`] until the sensor reports one.
    pub spot_id: SpotId,
    pub status: TicketStatus,
    /// When entry was confirmed.
    pub started_at: Timestamp,
    /// Paid time while `paid`; overwritten with the completion time when the
    /// exit is confirmed.
    pub ended_at: Option<Timestamp>,
    /// Fare in cents, computed at payment time.
    pub amount_cents: Option<i64>,
    /// Opaque payload rendered as a QR code by the client.
    pub verification: String,
}

impl Ticket {
    /// Create a freshly confirmed ticket: active, spot unresolved, with a
    /// new opaque verification payload.
    pub fn new(id: TicketId, user_id: UserId, started_at: Timestamp) -> Self {
        Self {
            id,
            user_id,
            spot_id: UNRESOLVED_SPOT.to_string(),
            status: TicketStatus::Active,
            started_at,
            ended_at: None,
            amount_cents: None,
            verification: Uuid::new_v4().to_string(),
        }
    }

    /// Whether the spot field still holds the unresolved sentinel.
    pub fn spot_unresolved(&self) -> bool {
        self.spot_id == UNRESOLVED_SPOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn legal_transitions() {
        assert!(TicketStatus::Active.can_transition_to(TicketStatus::Paid));
        assert!(TicketStatus::Paid.can_transition_to(TicketStatus::Completed));
        assert!(TicketStatus::Paid.can_transition_to(TicketStatus::Expired));
    }

    #[test]
    fn illegal_transitions() {
        assert!(!TicketStatus::Active.can_transition_to(TicketStatus::Completed));
        assert!(!TicketStatus::Active.can_transition_to(TicketStatus::Expired));
        assert!(!TicketStatus::Completed.can_transition_to(TicketStatus::Paid));
        assert!(!TicketStatus::Expired.can_transition_to(TicketStatus::Active));
        assert!(!TicketStatus::Paid.can_transition_to(TicketStatus::Active));
    }

    #[test]
    fn only_active_and_paid_are_open() {
        assert!(TicketStatus::Active.is_open());
        assert!(TicketStatus::Paid.is_open());
        assert!(!TicketStatus::Completed.is_open());
        assert!(!TicketStatus::Expired.is_open());
    }

    #[test]
    fn new_ticket_is_active_and_unresolved() {
        let t = Ticket::new("TKT-2025-137".into(), "user-1".into(), Utc::now());
        assert_eq!(t.status, TicketStatus::Active);
        assert!(t.spot_unresolved());
        assert!(t.ended_at.is_none());
        assert!(t.amount_cents.is_none());
        assert!(!t.verification.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(TicketStatus::Active).unwrap();
        assert_eq!(json, serde_json::json!("active"));
        let back: TicketStatus = serde_json::from_value(serde_json::json!("paid")).unwrap();
        assert_eq!(back, TicketStatus::Paid);
    }
}
