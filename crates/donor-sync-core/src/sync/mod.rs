//! Donor profile synchronization.
//!
//! ```text
//! ReferenceDataLoader ─┐
//!                      ├─> DonorProfileSync ─> FormState ─> SubmitController ─> DonorApi
//! RecordLoader ────────┘
//! ```
//!
//! Reference data and the donor record load concurrently. Health-condition
//! reconciliation runs only once both have completed, and at most once per
//! donor identity.

mod availability;
mod conditions;
mod form;
mod reconcile;
mod record;
mod reference;
mod submit;

pub use availability::*;
pub use conditions::*;
pub use form::*;
pub use reconcile::*;
pub use record::*;
pub use reference::*;
pub use submit::*;

use thiserror::Error;

use crate::api::{ApiError, ApiResponse, ApiResult, DonorApi};
use crate::config::SyncConfig;
use crate::models::{DonorProfile, DonorRecord, HealthConditionLink, SessionContext};

/// Sync-layer errors, one variant per failure class shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Profile is locked while the donor is ready")]
    Locked,

    #[error("No donor record loaded")]
    NotRegistered,

    #[error("Donor is already registered")]
    AlreadyRegistered,

    #[error("Reference data unavailable: {0}")]
    ReferenceUnavailable(String),

    #[error("Rejected by server: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("View has been torn down")]
    Detached,
}

impl SyncError {
    /// A rejection, dropping blank server messages.
    pub fn rejected(message: Option<String>) -> Self {
        SyncError::Rejected {
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub(crate) fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => SyncError::rejected(None),
            ApiError::Status { code, message } => {
                tracing::debug!(code, "Backend returned error status");
                SyncError::rejected(message)
            }
            ApiError::Transport(detail) => {
                tracing::error!(error = %detail, "Transport failure talking to donor backend");
                SyncError::Transport(detail)
            }
        }
    }

    /// Text for the dismissible in-view message.
    pub fn user_message(&self, config: &SyncConfig) -> String {
        match self {
            SyncError::Validation(_) => "Please correct the highlighted fields.".to_string(),
            SyncError::Locked => {
                "Your profile is read-only while you are marked ready. Turn readiness off to edit."
                    .to_string()
            }
            SyncError::NotRegistered => "Register as a donor first.".to_string(),
            SyncError::AlreadyRegistered => "You are already registered as a donor.".to_string(),
            SyncError::ReferenceUnavailable(_) => {
                "Blood types and health conditions could not be loaded.".to_string()
            }
            SyncError::Rejected { message } => message
                .clone()
                .unwrap_or_else(|| config.generic_failure_message.clone()),
            SyncError::Transport(_) => config.transport_failure_message.clone(),
            SyncError::Detached => "This view is no longer active.".to_string(),
        }
    }
}

impl From<FormError> for SyncError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Locked => SyncError::Locked,
            other => SyncError::Validation(ValidationErrors(vec![FieldError::new(
                "form",
                other.to_string(),
            )])),
        }
    }
}

/// Collapse transport failures and `success:false` into one error path.
pub(crate) fn settle<T>(result: ApiResult<ApiResponse<T>>) -> Result<T, SyncError> {
    result
        .map_err(SyncError::from_api)?
        .into_data()
        .map_err(|rejection| SyncError::rejected(rejection.message))
}

/// Which surface the host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    /// Show the registration form
    Unregistered,
    /// Show the profile editor
    Registered,
    /// The record could not be loaded
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Warning,
    Error,
}

/// A dismissible message for the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Owns the donor profile model and keeps it in step with the backend.
pub struct DonorProfileSync<A> {
    api: A,
    session: SessionContext,
    config: SyncConfig,
    reference: ReferenceDataLoader,
    view: ViewState,
    profile: Option<DonorProfile>,
    form: FormState,
    message: Option<UserMessage>,
    field_errors: ValidationErrors,
    mounted: bool,
}

impl<A: DonorApi> DonorProfileSync<A> {
    pub fn new(api: A, session: SessionContext, config: SyncConfig) -> Self {
        let form = FormState::new(&config);
        Self {
            api,
            session,
            config,
            reference: ReferenceDataLoader::new(),
            view: ViewState::Loading,
            profile: None,
            form,
            message: None,
            field_errors: ValidationErrors::default(),
            mounted: true,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceDataLoader {
        &self.reference
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn profile(&self) -> Option<&DonorProfile> {
        self.profile.as_ref()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn message(&self) -> Option<&UserMessage> {
        self.message.as_ref()
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Selected conditions that the reference list marks as blocking donation.
    pub fn eligibility_warnings(&self) -> Vec<String> {
        self.form
            .conditions()
            .eligibility_warnings(self.reference.health_conditions())
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// Stop applying results. Dropping an in-flight future cancels it;
    /// calls made after teardown return [`SyncError::Detached`].
    pub fn teardown(&mut self) {
        tracing::debug!("Donor profile view torn down");
        self.mounted = false;
    }

    /// Load reference data and the donor record concurrently.
    pub async fn initialize(&mut self) -> Result<(), SyncError> {
        self.ensure_mounted()?;
        self.view = ViewState::Loading;

        let loader = RecordLoader::new(&self.api);
        let (reference, record) = futures::join!(self.reference.load(&self.api), loader.load());

        if let Err(err) = reference {
            self.show(MessageKind::Warning, err.user_message(&self.config));
        }

        match record {
            Ok(outcome) => {
                self.apply_outcome(outcome);
                Ok(())
            }
            Err(err) => {
                self.view = ViewState::Failed;
                Err(self.fail(err))
            }
        }
    }

    /// Re-fetch reference lists. Never reseeds the condition selection.
    pub async fn refresh_reference_data(&mut self) -> Result<(), SyncError> {
        self.ensure_mounted()?;
        match self.reference.load(&self.api).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.show(MessageKind::Warning, err.user_message(&self.config));
                Err(err)
            }
        }
    }

    /// Reload the record in place without entering the loading state.
    pub async fn reload_record(&mut self) -> Result<(), SyncError> {
        self.ensure_mounted()?;
        match RecordLoader::new(&self.api).load().await {
            Ok(outcome) => {
                self.apply_outcome(outcome);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Register the signed-in user from the current form.
    pub async fn register(&mut self) -> Result<(), SyncError> {
        self.ensure_mounted()?;
        self.clear_feedback();
        if self.profile.is_some() {
            return Err(self.fail(SyncError::AlreadyRegistered));
        }

        let result = SubmitController::new(&self.api, &self.config)
            .register(&self.session, &self.form)
            .await;

        match result {
            Ok(mut record) => {
                self.backfill_from_form(&mut record);
                self.ensure_reference().await;
                self.adopt_record(record);
                self.show(MessageKind::Success, "Registration complete.".to_string());
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Save form edits, then reload so fields show server-normalized values.
    pub async fn update(&mut self) -> Result<(), SyncError> {
        self.ensure_mounted()?;
        self.clear_feedback();
        let donor_id = match self.donor_id() {
            Some(id) => id,
            None => return Err(self.fail(SyncError::NotRegistered)),
        };

        let result = SubmitController::new(&self.api, &self.config)
            .update(donor_id, &self.form)
            .await;

        match result {
            Ok(_) => {
                self.show(MessageKind::Success, "Profile saved.".to_string());
                self.refresh_after_save(donor_id).await;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Flip readiness. Patches only `is_ready`; nothing is reloaded.
    pub async fn toggle_ready(&mut self, is_ready: bool) -> Result<(), SyncError> {
        self.ensure_mounted()?;
        self.clear_feedback();
        let donor_id = match self.donor_id() {
            Some(id) => id,
            None => return Err(self.fail(SyncError::NotRegistered)),
        };

        let result = SubmitController::new(&self.api, &self.config)
            .toggle_ready(donor_id, is_ready)
            .await;

        match result {
            Ok(confirmed) => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.is_ready = confirmed;
                }
                self.form.set_ready(confirmed);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // The save already succeeded, so a failed or empty reload keeps the
    // current profile and the success message.
    async fn refresh_after_save(&mut self, donor_id: i64) {
        match RecordLoader::new(&self.api).load().await {
            Ok(RecordOutcome::Registered(record)) => self.adopt_record(record),
            Ok(RecordOutcome::NotRegistered) => {
                tracing::warn!(donor_id, "Reload after save found no donor record, keeping profile");
            }
            Err(err) => {
                tracing::warn!(donor_id, error = %err, "Reload after save failed, keeping profile");
            }
        }
    }

    fn donor_id(&self) -> Option<i64> {
        self.profile.as_ref().map(|p| p.donor_id)
    }

    fn apply_outcome(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::NotRegistered => {
                tracing::debug!(user_id = self.session.user_id, "No donor record yet");
                self.profile = None;
                self.session.donor_id = None;
                self.form.reset(&self.config);
                self.view = ViewState::Unregistered;
            }
            RecordOutcome::Registered(record) => self.adopt_record(record),
        }
    }

    fn adopt_record(&mut self, record: DonorRecord) {
        let ids = reconcile_health_condition_ids(
            &record.health_conditions,
            self.reference.health_conditions(),
        );
        let profile = DonorProfile::from_record(record, ids);
        tracing::debug!(
            donor_id = profile.donor_id,
            conditions = profile.health_condition_ids.len(),
            slots = profile.availabilities.len(),
            "Donor record adopted"
        );

        self.session.donor_id = Some(profile.donor_id);
        self.form.apply_profile(&profile);
        self.profile = Some(profile);
        self.view = ViewState::Registered;
    }

    // Registration responses may omit nested collections; fall back to
    // what was just submitted.
    fn backfill_from_form(&self, record: &mut DonorRecord) {
        if record.availabilities.is_empty() {
            record.availabilities = self.form.availability().slots().to_vec();
        }
        if record.health_conditions.is_empty() {
            record.health_conditions = self
                .form
                .conditions()
                .selected()
                .iter()
                .map(|id| HealthConditionLink::by_condition_id(*id))
                .collect();
        }
    }

    // Reconciliation must not run before reference data has been tried once.
    async fn ensure_reference(&mut self) {
        if !self.reference.has_attempted() {
            let _ = self.reference.load(&self.api).await;
        }
    }

    fn ensure_mounted(&self) -> Result<(), SyncError> {
        if self.mounted {
            Ok(())
        } else {
            tracing::debug!("Ignoring call on torn-down view");
            Err(SyncError::Detached)
        }
    }

    fn clear_feedback(&mut self) {
        self.message = None;
        self.field_errors = ValidationErrors::default();
    }

    fn show(&mut self, kind: MessageKind, text: String) {
        self.message = Some(UserMessage { kind, text });
    }

    fn fail(&mut self, err: SyncError) -> SyncError {
        if let SyncError::Validation(errors) = &err {
            self.field_errors = errors.clone();
        }
        self.show(MessageKind::Error, err.user_message(&self.config));
        err
    }
}
