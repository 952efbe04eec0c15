//! Tunables for the donor profile editor.

use serde::{Deserialize, Serialize};

use crate::models::{AvailabilitySlot, DEFAULT_TRAVEL_RADIUS_KM};

/// Editor and messaging configuration. Every field has a default, so a
/// host may pass a partial JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Radius offered to a new donor
    pub default_travel_radius_km: f64,
    /// Inclusive lower bound for the radius
    pub min_travel_radius_km: f64,
    /// Inclusive upper bound for the radius
    pub max_travel_radius_km: f64,
    /// Slot appended by the availability editor's `add`
    pub default_slot: AvailabilitySlot,
    /// Shown when the backend rejects without a message
    pub generic_failure_message: String,
    /// Shown on transport failures
    pub transport_failure_message: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_travel_radius_km: DEFAULT_TRAVEL_RADIUS_KM,
            min_travel_radius_km: 1.0,
            max_travel_radius_km: 100.0,
            default_slot: AvailabilitySlot::new(1, 9 * 60, 17 * 60),
            generic_failure_message: "The request could not be completed.".to_string(),
            transport_failure_message:
                "Could not reach the server. Check your connection and try again.".to_string(),
        }
    }
}

impl SyncConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn radius_in_range(&self, radius_km: f64) -> bool {
        radius_km.is_finite()
            && radius_km >= self.min_travel_radius_km
            && radius_km <= self.max_travel_radius_km
    }
}
