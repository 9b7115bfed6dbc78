//! Fare calculator.
//!
//! A pure per-started-hour tariff: every started hour is billed in full,
//! with a minimum of one hour.

use crate::types::Timestamp;

/// Tariff in cents per started hour.
pub const RATE_CENTS_PER_HOUR: i64 = 250;

/// Fare in cents for a session from `started_at` to `ended_at`.
///
/// Clock skew (end before start) is clamped to the one-hour minimum.
pub fn amount_cents(started_at: Timestamp, ended_at: Timestamp) -> i64 {
    let secs = ended_at.signed_duration_since(started_at).num_seconds().max(0);
    let started_hours = (secs + 3599) / 3600;
    started_hours.max(1) * RATE_CENTS_PER_HOUR
}
