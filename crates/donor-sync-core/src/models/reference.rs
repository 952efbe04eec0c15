//! Reference data models (blood types, health conditions).

use serde::{Deserialize, Serialize};

/// Canonical display order for ABO/Rh codes.
pub const BLOOD_TYPE_ORDER: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// A blood type as served by the reference-data endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BloodType {
    /// Server identifier
    pub id: i64,
    /// Short label (e.g., "A+")
    pub code: String,
    /// Display label
    #[serde(default)]
    pub name: String,
}

impl BloodType {
    pub fn new(id: i64, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
        }
    }

    /// Position in [`BLOOD_TYPE_ORDER`]; unknown codes rank after every known one.
    pub fn canonical_rank(&self) -> usize {
        let code = self.code.trim().to_uppercase();
        BLOOD_TYPE_ORDER
            .iter()
            .position(|c| *c == code)
            .unwrap_or(BLOOD_TYPE_ORDER.len())
    }
}

/// Sort blood types into canonical order. Stable, so unknown codes keep
/// their server order at the tail.
pub fn sort_blood_types(types: &mut [BloodType]) {
    types.sort_by_key(BloodType::canonical_rank);
}

/// A health condition a donor may declare.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCondition {
    /// Server identifier
    pub id: i64,
    /// Display label
    pub name: String,
    /// Whether the condition still allows donation (None = unknown)
    #[serde(default)]
    pub is_donation_eligible: Option<bool>,
}

impl HealthCondition {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_donation_eligible: None,
        }
    }

    /// True only when the server explicitly marks the condition as blocking.
    pub fn blocks_donation(&self) -> bool {
        self.is_donation_eligible == Some(false)
    }
}
