//! Ticket identifier formatting.
//!
//! Identifiers are human-readable: an era tag (`TKT-{year}`) plus a numeric
//! suffix, e.g. `TKT-2025-137`. The collision-avoidance loop that checks a
//! candidate against the store lives in `parkgate-coord`; this module only
//! produces candidates.

use chrono::Datelike;
use rand::Rng;

use crate::types::{TicketId, Timestamp};

/// Prefix of every ticket id.
pub const PREFIX: &str = "TKT";

/// Inclusive range of random suffixes.
const SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 1..=9999;

/// Format a ticket id from an era year and a suffix.
pub fn format_id(year: i32, suffix: impl std::fmt::Display) -> TicketId {
    format!("{PREFIX}-{year}-{suffix}")
}

/// A random candidate id for the era of `now`.
pub fn random_candidate(now: Timestamp) -> TicketId {
    let suffix = rand::rng().random_range(SUFFIX_RANGE);
    format_id(now.year(), suffix)
}

/// A clock-derived candidate, used after repeated random collisions.
///
/// The nanosecond timestamp makes a second collision practically
/// impossible without requiring a cryptographic scheme.
pub fn clock_candidate(now: Timestamp) -> TicketId {
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp());
    format_id(now.year(), nanos)
}
