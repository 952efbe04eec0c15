//! Write payloads sent to the donor endpoints.

use serde::{Deserialize, Serialize};

use super::AvailabilitySlot;

/// Creation payload for `registerDonor`.
///
/// Empty collections are omitted entirely rather than sent as `[]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDonorPayload {
    pub user_id: i64,
    pub blood_type_id: i64,
    pub travel_radius_km: f64,
    pub full_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availabilities: Option<Vec<AvailabilitySlot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_condition_ids: Option<Vec<i64>>,
}

/// Partial update payload for `updateMyDonor`.
///
/// `blood_type_id` and `full_address` are only present when changed.
/// Collections are always sent so a user can clear them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    pub travel_radius_km: f64,
    pub availabilities: Vec<AvailabilitySlot>,
    pub health_condition_ids: Vec<i64>,
}

/// Payload for `updateReadyStatus`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadyStatusPayload {
    pub donor_id: i64,
    pub is_ready: bool,
}

/// Wrap a collection, dropping it when empty.
pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
