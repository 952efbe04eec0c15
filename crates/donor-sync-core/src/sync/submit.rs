//! Write commands: register, update, and the readiness toggle.
//!
//! `update` and `toggle_ready` are separate commands with different
//! post-conditions: the caller reloads after an update but only patches
//! `is_ready` after a toggle, since toggle responses may be sparse.

use crate::api::DonorApi;
use crate::config::SyncConfig;
use crate::models::{DonorRecord, ReadyStatusPayload, SessionContext};

use super::{settle, FormState, SyncError};

/// Validates the form and issues write calls. Holds no state of its own.
pub struct SubmitController<'a, A> {
    api: &'a A,
    config: &'a SyncConfig,
}

impl<'a, A: DonorApi> SubmitController<'a, A> {
    pub fn new(api: &'a A, config: &'a SyncConfig) -> Self {
        Self { api, config }
    }

    /// Create the donor record. Fails before any network call on a
    /// missing address or blood type.
    pub async fn register(
        &self,
        session: &SessionContext,
        form: &FormState,
    ) -> Result<DonorRecord, SyncError> {
        if form.is_ready() {
            return Err(SyncError::Locked);
        }
        form.validate_for_register(self.config)
            .map_err(SyncError::Validation)?;

        let payload = form.register_payload(session.user_id);
        let record = settle(self.api.register_donor(&payload).await)?;
        tracing::info!(donor_id = record.donor_id, user_id = session.user_id, "Donor registered");
        Ok(record)
    }

    /// Partial update. Rejected while the donor is ready or any slot is inverted.
    pub async fn update(&self, donor_id: i64, form: &FormState) -> Result<DonorRecord, SyncError> {
        if form.is_ready() {
            return Err(SyncError::Locked);
        }
        form.validate_for_update(self.config)
            .map_err(SyncError::Validation)?;

        let payload = form.update_payload();
        let record = settle(self.api.update_my_donor(donor_id, &payload).await)?;
        tracing::info!(donor_id, slots = payload.availabilities.len(), "Donor profile updated");
        Ok(record)
    }

    /// Flip readiness. Always permitted; returns the server's resulting flag.
    pub async fn toggle_ready(&self, donor_id: i64, is_ready: bool) -> Result<bool, SyncError> {
        let payload = ReadyStatusPayload { donor_id, is_ready };
        let response = self
            .api
            .update_ready_status(donor_id, &payload)
            .await
            .map_err(SyncError::from_api)?;

        if !response.success {
            return Err(SyncError::rejected(response.message));
        }

        // Toggle responses may omit the flag; trust the request then.
        let confirmed = response
            .data
            .and_then(|record| record.is_ready)
            .unwrap_or(is_ready);
        tracing::info!(donor_id, is_ready = confirmed, "Readiness updated");
        Ok(confirmed)
    }
}
