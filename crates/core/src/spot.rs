//! Parking spot document and sensor-id normalization.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{SpotId, UserId};

/// Longest raw identifier the sensor endpoint accepts.
const MAX_RAW_LEN: usize = 16;

/// One physical parking space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
    /// Document id, `spot{number}`.
    pub id: SpotId,
    /// Ordinal number painted on the ground.
    pub number: u32,
    pub occupied: bool,
    /// Owner of the ticket currently holding the spot.
    pub assigned_user: Option<UserId>,
}

impl ParkingSpot {
    /// A free, unassigned spot with the given ordinal.
    pub fn free(number: u32) -> Self {
        Self {
            id: spot_doc_id(number),
            number,
            occupied: false,
            assigned_user: None,
        }
    }
}

/// Document id for a spot ordinal.
pub fn spot_doc_id(number: u32) -> SpotId {
    format!("spot{number}")
}

/// Normalize a raw sensor identifier to a spot document id.
///
/// Accepts either a bare ordinal (`"3"`) or a fully-qualified id
/// (`"spot3"`). Anything else is an `InvalidArgument`.
pub fn normalize_spot_id(raw: &str) -> CoreResult<SpotId> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > MAX_RAW_LEN {
        return Err(CoreError::InvalidArgument(format!(
            "spot identifier must be 1-{MAX_RAW_LEN} characters"
        )));
    }

    let ordinal = raw.strip_prefix("spot").unwrap_or(raw);
    let number: u32 = ordinal.parse().map_err(|_| {
        CoreError::InvalidArgument(format!("'{raw}' is not a spot number or spot id"))
    })?;

    Ok(spot_doc_id(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bare_ordinal_normalizes() {
        assert_eq!(normalize_spot_id("3").unwrap(), "spot3");
        assert_eq!(normalize_spot_id(" 12 ").unwrap(), "spot12");
    }

    #[test]
    fn qualified_id_normalizes() {
        assert_eq!(normalize_spot_id("spot3").unwrap(), "spot3");
    }

    #[test]
    fn garbage_is_invalid_argument() {
        assert_matches!(normalize_spot_id(""), Err(CoreError::InvalidArgument(_)));
        assert_matches!(normalize_spot_id("lot-b"), Err(CoreError::InvalidArgument(_)));
        assert_matches!(normalize_spot_id("spotx"), Err(CoreError::InvalidArgument(_)));
        assert_matches!(
            normalize_spot_id("spot99999999999999999"),
            Err(CoreError::InvalidArgument(_))
        );
    }
}
