//! Lot lighting state, flipped by time of day.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Document id of the lighting state within the `lighting` collection.
pub const STATE_DOC: &str = "state";

/// Hour (UTC) at which the lights go out in the morning.
const LIGHTS_OFF_HOUR: u32 = 6;
/// Hour (UTC) at which the lights come on in the evening.
const LIGHTS_ON_HOUR: u32 = 18;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lighting {
    pub on: bool,
    pub updated_at: Timestamp,
}

/// Whether the lights should be on at the given hour of day.
pub fn lights_on_at_hour(hour: u32) -> bool {
    hour < LIGHTS_OFF_HOUR || hour >= LIGHTS_ON_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_hours_are_lit() {
        assert!(lights_on_at_hour(0));
        assert!(lights_on_at_hour(5));
        assert!(lights_on_at_hour(18));
        assert!(lights_on_at_hour(23));
    }

    #[test]
    fn day_hours_are_dark() {
        assert!(!lights_on_at_hour(6));
        assert!(!lights_on_at_hour(12));
        assert!(!lights_on_at_hour(17));
    }
}
