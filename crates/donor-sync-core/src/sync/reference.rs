//! Reference-data loading (blood types, health conditions).

use crate::api::DonorApi;
use crate::models::{sort_blood_types, BloodType, HealthCondition};

use super::{settle, SyncError};

/// Holds the reference lists and the state of the last fetch.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataLoader {
    blood_types: Vec<BloodType>,
    health_conditions: Vec<HealthCondition>,
    error: Option<String>,
    attempted: bool,
}

impl ReferenceDataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blood_types(&self) -> &[BloodType] {
        &self.blood_types
    }

    pub fn health_conditions(&self) -> &[HealthCondition] {
        &self.health_conditions
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// At least one fetch has completed, successfully or not.
    pub fn has_attempted(&self) -> bool {
        self.attempted
    }

    /// Fetch both lists concurrently. Lists are replaced only when both
    /// fetches succeed; on failure the previous lists stay as they were.
    /// The host sees loading as this future still pending.
    pub async fn load<A: DonorApi>(&mut self, api: &A) -> Result<(), SyncError> {
        tracing::debug!("Loading reference data");

        let (blood_types, conditions) =
            futures::join!(api.get_blood_types(), api.get_health_conditions());

        let outcome = settle(blood_types).and_then(|b| settle(conditions).map(|c| (b, c)));

        self.attempted = true;

        match outcome {
            Ok((mut blood_types, health_conditions)) => {
                sort_blood_types(&mut blood_types);
                tracing::debug!(
                    blood_types = blood_types.len(),
                    health_conditions = health_conditions.len(),
                    "Reference data loaded"
                );
                self.blood_types = blood_types;
                self.health_conditions = health_conditions;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Reference data unavailable");
                let err = SyncError::ReferenceUnavailable(err.to_string());
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
