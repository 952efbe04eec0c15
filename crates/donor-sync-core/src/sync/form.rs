//! Editable donor form state and client-side validation.

use std::fmt;

use thiserror::Error;

use crate::config::SyncConfig;
use crate::models::{
    non_empty, DonorProfile, RegisterDonorPayload, TimeParseError, UpdateDonorPayload,
};

use super::{validate_slots, AvailabilityEditor, HealthConditionSelector};

/// Errors from a single form interaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Profile is read-only while the donor is marked ready")]
    Locked,

    #[error("No availability slot at index {0}")]
    SlotIndex(usize),

    #[error("Weekday must be 0-6, got {0}")]
    InvalidWeekday(u8),

    #[error("Invalid time: {0}")]
    InvalidTime(#[from] TimeParseError),
}

/// A validation problem attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All field errors found by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// Values last loaded from the server, for change detection on update.
#[derive(Debug, Clone, PartialEq)]
struct Baseline {
    blood_type_id: i64,
    full_address: String,
}

/// The donor form: scalar fields plus the availability and condition editors.
#[derive(Debug, Clone)]
pub struct FormState {
    blood_type_id: i64,
    full_address: String,
    travel_radius_km: f64,
    is_ready: bool,
    availability: AvailabilityEditor,
    conditions: HealthConditionSelector,
    baseline: Option<Baseline>,
}

impl FormState {
    /// A blank registration form.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            blood_type_id: 0,
            full_address: String::new(),
            travel_radius_km: config.default_travel_radius_km,
            is_ready: false,
            availability: AvailabilityEditor::new(config.default_slot),
            conditions: HealthConditionSelector::new(),
            baseline: None,
        }
    }

    pub fn blood_type_id(&self) -> i64 {
        self.blood_type_id
    }

    pub fn full_address(&self) -> &str {
        &self.full_address
    }

    pub fn travel_radius_km(&self) -> f64 {
        self.travel_radius_km
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn availability(&self) -> &AvailabilityEditor {
        &self.availability
    }

    pub fn conditions(&self) -> &HealthConditionSelector {
        &self.conditions
    }

    pub fn set_blood_type(&mut self, blood_type_id: i64) -> Result<(), FormError> {
        self.ensure_unlocked()?;
        self.blood_type_id = blood_type_id;
        Ok(())
    }

    pub fn set_full_address(&mut self, address: impl Into<String>) -> Result<(), FormError> {
        self.ensure_unlocked()?;
        self.full_address = address.into();
        Ok(())
    }

    pub fn set_travel_radius(&mut self, radius_km: f64) -> Result<(), FormError> {
        self.ensure_unlocked()?;
        self.travel_radius_km = radius_km;
        Ok(())
    }

    /// Mutable access to the availability editor (which enforces the lock itself).
    pub fn availability_mut(&mut self) -> &mut AvailabilityEditor {
        &mut self.availability
    }

    /// Mutable access to the condition selector (which enforces the lock itself).
    pub fn conditions_mut(&mut self) -> &mut HealthConditionSelector {
        &mut self.conditions
    }

    /// Mirror the server's readiness flag and lock or unlock every editor.
    pub(crate) fn set_ready(&mut self, is_ready: bool) {
        self.is_ready = is_ready;
        self.availability.set_locked(is_ready);
        self.conditions.set_locked(is_ready);
    }

    /// Overwrite scalars and slots from a loaded profile. Condition
    /// selection is seeded separately so edits in progress survive.
    pub(crate) fn apply_profile(&mut self, profile: &DonorProfile) {
        self.blood_type_id = profile.blood_type_id;
        self.full_address = profile.full_address.clone();
        self.travel_radius_km = profile.travel_radius_km;
        self.availability.load(profile.availabilities.clone());
        self.baseline = Some(Baseline {
            blood_type_id: profile.blood_type_id,
            full_address: profile.full_address.clone(),
        });
        self.set_ready(profile.is_ready);
        self.conditions.seed(profile.donor_id, &profile.health_condition_ids);
    }

    /// Back to a blank registration form.
    pub(crate) fn reset(&mut self, config: &SyncConfig) {
        self.conditions.reset();
        self.blood_type_id = 0;
        self.full_address.clear();
        self.travel_radius_km = config.default_travel_radius_km;
        self.availability.load(Vec::new());
        self.baseline = None;
        self.set_ready(false);
    }

    /// Required fields for registration, radius range and slot order.
    pub fn validate_for_register(&self, config: &SyncConfig) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.full_address.trim().is_empty() {
            errors.push(FieldError::new("fullAddress", "Address is required"));
        }
        if self.blood_type_id <= 0 {
            errors.push(FieldError::new("bloodTypeId", "Select a blood type"));
        }
        errors.extend(self.shared_errors(config));
        ValidationErrors(errors).into_result()
    }

    /// Radius range and slot order. Address and blood type may stay as loaded.
    pub fn validate_for_update(&self, config: &SyncConfig) -> Result<(), ValidationErrors> {
        ValidationErrors(self.shared_errors(config)).into_result()
    }

    fn shared_errors(&self, config: &SyncConfig) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !config.radius_in_range(self.travel_radius_km) {
            errors.push(FieldError::new(
                "travelRadiusKm",
                format!(
                    "Travel radius must be between {} and {} km",
                    config.min_travel_radius_km, config.max_travel_radius_km
                ),
            ));
        }
        errors.extend(validate_slots(self.availability.slots()));
        errors
    }

    pub fn register_payload(&self, user_id: i64) -> RegisterDonorPayload {
        RegisterDonorPayload {
            user_id,
            blood_type_id: self.blood_type_id,
            travel_radius_km: self.travel_radius_km,
            full_address: self.full_address.trim().to_string(),
            availabilities: non_empty(self.availability.slots().to_vec()),
            health_condition_ids: non_empty(self.conditions.selected().iter().copied().collect()),
        }
    }

    /// Partial update; blood type and address only when changed and non-empty.
    pub fn update_payload(&self) -> UpdateDonorPayload {
        let address = self.full_address.trim();
        let (blood_type_changed, address_changed) = match &self.baseline {
            Some(base) => (
                base.blood_type_id != self.blood_type_id,
                base.full_address.trim() != address,
            ),
            None => (true, true),
        };

        UpdateDonorPayload {
            blood_type_id: (blood_type_changed && self.blood_type_id > 0)
                .then_some(self.blood_type_id),
            full_address: (address_changed && !address.is_empty()).then(|| address.to_string()),
            travel_radius_km: self.travel_radius_km,
            availabilities: self.availability.slots().to_vec(),
            health_condition_ids: self.conditions.selected().iter().copied().collect(),
        }
    }

    fn ensure_unlocked(&self) -> Result<(), FormError> {
        if self.is_ready {
            Err(FormError::Locked)
        } else {
            Ok(())
        }
    }
}
