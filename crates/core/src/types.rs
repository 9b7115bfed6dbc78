/// User identifiers come from the external identity provider and are opaque.
pub type UserId = String;

/// Ticket identifiers follow the `TKT-{year}-{suffix}` pattern.
pub type TicketId = String;

/// Spot identifiers are `spot{number}`.
pub type SpotId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
