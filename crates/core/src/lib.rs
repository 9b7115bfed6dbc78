//! Parkgate domain model.
//!
//! Plain data types and pure functions shared by every other crate:
//! tickets, spots, barriers, pending-confirmation markers, the protocol
//! error taxonomy, protocol timing constants, ticket-id formatting, and
//! the fare calculator. Nothing in this crate touches the store or the
//! network.

pub mod barrier;
pub mod error;
pub mod lighting;
pub mod pending;
pub mod pricing;
pub mod protocol;
pub mod spot;
pub mod ticket;
pub mod ticket_id;
pub mod types;
