//! Donor record (wire shape) and reconciled donor profile.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::AvailabilitySlot;

/// Travel radius used when neither the server nor the user supplied one.
pub const DEFAULT_TRAVEL_RADIUS_KM: f64 = 10.0;

/// A health-condition association as embedded in a donor read.
///
/// Donor reads key the condition on `conditionId`; standalone listings key
/// it on `id`. Either or both may be present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthConditionLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl HealthConditionLink {
    pub fn by_condition_id(condition_id: i64) -> Self {
        Self {
            condition_id: Some(condition_id),
            ..Default::default()
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The id the server meant, before any reconciliation.
    pub fn raw_id(&self) -> Option<i64> {
        self.condition_id.or(self.id)
    }
}

/// Donor record exactly as returned by either read endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "RawDonorRecord")]
pub struct DonorRecord {
    pub donor_id: i64,
    pub blood_type_id: i64,
    pub address_id: Option<i64>,
    pub full_address: Option<String>,
    pub travel_radius_km: Option<f64>,
    /// None when the response did not echo the flag
    pub is_ready: Option<bool>,
    pub next_eligible_date: Option<NaiveDate>,
    pub availabilities: Vec<AvailabilitySlot>,
    pub health_conditions: Vec<HealthConditionLink>,
}

// Reads identify the donor as `donorId`, `id`, or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDonorRecord {
    #[serde(default)]
    donor_id: Option<i64>,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    blood_type_id: Option<i64>,
    #[serde(default)]
    address_id: Option<i64>,
    #[serde(default)]
    full_address: Option<String>,
    #[serde(default)]
    travel_radius_km: Option<f64>,
    #[serde(default)]
    is_ready: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    next_eligible_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_empty")]
    availabilities: Vec<AvailabilitySlot>,
    #[serde(default, deserialize_with = "null_as_empty")]
    health_conditions: Vec<HealthConditionLink>,
}

impl TryFrom<RawDonorRecord> for DonorRecord {
    type Error = String;

    fn try_from(raw: RawDonorRecord) -> Result<Self, Self::Error> {
        let donor_id = raw
            .donor_id
            .or(raw.id)
            .ok_or_else(|| "donor record has neither donorId nor id".to_string())?;
        Ok(Self {
            donor_id,
            blood_type_id: raw.blood_type_id.unwrap_or_default(),
            address_id: raw.address_id,
            full_address: raw.full_address,
            travel_radius_km: raw.travel_radius_km,
            is_ready: raw.is_ready,
            next_eligible_date: raw.next_eligible_date,
            availabilities: raw.availabilities,
            health_conditions: raw.health_conditions,
        })
    }
}

impl DonorRecord {
    pub fn new(donor_id: i64, blood_type_id: i64) -> Self {
        Self {
            donor_id,
            blood_type_id,
            address_id: None,
            full_address: None,
            travel_radius_km: None,
            is_ready: None,
            next_eligible_date: None,
            availabilities: Vec::new(),
            health_conditions: Vec::new(),
        }
    }

    /// Both nested collections are empty. Some list endpoints omit them.
    pub fn has_sparse_collections(&self) -> bool {
        self.availabilities.is_empty() && self.health_conditions.is_empty()
    }
}

/// The reconciled, locally editable donor profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonorProfile {
    pub donor_id: i64,
    pub blood_type_id: i64,
    pub address_id: Option<i64>,
    pub full_address: String,
    pub travel_radius_km: f64,
    pub is_ready: bool,
    pub next_eligible_date: Option<NaiveDate>,
    pub availabilities: Vec<AvailabilitySlot>,
    pub health_condition_ids: BTreeSet<i64>,
}

impl DonorProfile {
    /// Build a profile from a record whose condition links were already
    /// reconciled into `health_condition_ids`.
    pub fn from_record(record: DonorRecord, health_condition_ids: BTreeSet<i64>) -> Self {
        Self {
            donor_id: record.donor_id,
            blood_type_id: record.blood_type_id,
            address_id: record.address_id,
            full_address: record.full_address.unwrap_or_default(),
            travel_radius_km: record.travel_radius_km.unwrap_or(DEFAULT_TRAVEL_RADIUS_KM),
            is_ready: record.is_ready.unwrap_or(false),
            next_eligible_date: record.next_eligible_date,
            availabilities: record.availabilities,
            health_condition_ids,
        }
    }

    /// Whether the server-computed eligibility date has been reached.
    pub fn can_donate_on(&self, date: NaiveDate) -> bool {
        self.next_eligible_date.map_or(true, |next| date >= next)
    }

    /// Edits are locked while the donor is on call.
    pub fn is_locked(&self) -> bool {
        self.is_ready
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Accepts "YYYY-MM-DD" as well as full timestamps; only the date part is kept.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let date_part = value.get(..10).unwrap_or(value);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_embedded_record() {
        let json = r#"{
            "donorId": 42,
            "bloodTypeId": 3,
            "addressId": 9,
            "fullAddress": "12 Harbour Rd",
            "travelRadiusKm": 25.0,
            "isReady": false,
            "nextEligibleDate": "2024-05-01T00:00:00Z",
            "availabilities": [{"weekday": 1, "timeFromMin": 540, "timeToMin": 1020}],
            "healthConditions": [{"id": 77, "conditionId": 3, "name": "Diabetes"}]
        }"#;
        let record: DonorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.donor_id, 42);
        assert_eq!(record.next_eligible_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(record.health_conditions[0].raw_id(), Some(3));
        assert!(!record.has_sparse_collections());
    }

    #[test]
    fn test_record_without_identity_is_rejected() {
        let result: Result<DonorRecord, _> = serde_json::from_str(r#"{"bloodTypeId": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"id": 42, "bloodTypeId": 3, "healthConditions": null}"#;
        let record: DonorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.donor_id, 42);
        assert!(record.has_sparse_collections());
        assert!(record.next_eligible_date.is_none());
        assert_eq!(record.is_ready, None);
    }

    #[test]
    fn test_profile_defaults() {
        let profile = DonorProfile::from_record(DonorRecord::new(1, 2), BTreeSet::new());
        assert_eq!(profile.travel_radius_km, DEFAULT_TRAVEL_RADIUS_KM);
        assert_eq!(profile.full_address, "");
        assert!(!profile.is_locked());
    }

    #[test]
    fn test_can_donate_on() {
        let mut profile = DonorProfile::from_record(DonorRecord::new(1, 2), BTreeSet::new());
        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        assert!(profile.can_donate_on(today));

        profile.next_eligible_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert!(!profile.can_donate_on(today));
        assert!(profile.can_donate_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    }
}
