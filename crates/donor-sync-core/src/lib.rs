//! Donor-Sync Core Library
//!
//! Client-side model of a blood donor's profile, kept in step with a remote
//! donor backend.
//!
//! # Architecture
//!
//! ```text
//!   get_blood_types ────────┐
//!   get_health_conditions ──┴─> ReferenceDataLoader ─┐
//!                                                     ├─> DonorProfileSync ─> FormState
//!   get_my_donor ─┬─> RecordLoader ───────────────────┘                          │
//!   (sparse) ─────┴─> get_donor_by_id                                            ▼
//!                                                                      SubmitController
//!                                                       register / update / toggle_ready
//! ```
//!
//! # Core Principle
//!
//! **A donor marked ready cannot edit.** While `is_ready` is true every
//! editing operation is rejected client-side; only the readiness toggle goes through.
//!
//! # Modules
//!
//! - [`api`]: Backend service contract and response envelope
//! - [`config`]: Editor defaults and user-facing fallback messages
//! - [`db`]: SQLite session persistence
//! - [`models`]: Domain types (BloodType, HealthCondition, DonorProfile, etc.)
//! - [`sync`]: Loaders, editors, reconciliation and the submit commands

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod sync;

// Re-export commonly used types
pub use api::{ApiError, ApiResponse, DonorApi};
pub use config::SyncConfig;
pub use db::Database;
pub use models::{
    AvailabilitySlot, BloodType, DonorProfile, DonorRecord, HealthCondition,
    HealthConditionLink, SessionContext,
};
pub use sync::{DonorProfileSync, SlotEdit, SyncError, ViewState};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DonorSyncError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Sync error: {0}")]
    SyncError(String),
}

impl From<db::DbError> for DonorSyncError {
    fn from(e: db::DbError) -> Self {
        DonorSyncError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for DonorSyncError {
    fn from(e: serde_json::Error) -> Self {
        DonorSyncError::SerializationError(e.to_string())
    }
}

impl From<models::TimeParseError> for DonorSyncError {
    fn from(e: models::TimeParseError) -> Self {
        DonorSyncError::InvalidInput(e.to_string())
    }
}

impl From<sync::SyncError> for DonorSyncError {
    fn from(e: sync::SyncError) -> Self {
        DonorSyncError::SyncError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DonorSyncError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DonorSyncError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a session store at the given path.
#[uniffi::export]
pub fn open_session_store(path: String) -> Result<Arc<SessionStore>, DonorSyncError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(SessionStore {
        db: Mutex::new(db),
    }))
}

/// Create an in-memory session store (for testing).
#[uniffi::export]
pub fn open_session_store_in_memory() -> Result<Arc<SessionStore>, DonorSyncError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(SessionStore {
        db: Mutex::new(db),
    }))
}

// =========================================================================
// Stateless Helpers (exported to FFI)
// =========================================================================

/// Parse `HH:MM` into minutes since midnight.
#[uniffi::export]
pub fn parse_hhmm(value: String) -> Result<u16, DonorSyncError> {
    Ok(models::hhmm_to_minutes(&value)?)
}

/// Format minutes since midnight as `HH:MM`.
#[uniffi::export]
pub fn format_hhmm(minutes: u16) -> String {
    models::minutes_to_hhmm(minutes)
}

/// Map embedded condition links onto reference ids.
#[uniffi::export]
pub fn reconcile_condition_ids(
    links: Vec<FfiConditionLink>,
    reference: Vec<FfiHealthCondition>,
) -> Vec<i64> {
    let links: Vec<HealthConditionLink> = links.into_iter().map(Into::into).collect();
    let reference: Vec<HealthCondition> = reference.into_iter().map(Into::into).collect();
    sync::reconcile_health_condition_ids(&links, &reference)
        .into_iter()
        .collect()
}

/// Field errors for a list of slots; empty when all are valid.
#[uniffi::export]
pub fn validate_availability(slots: Vec<FfiAvailabilitySlot>) -> Vec<FfiFieldError> {
    let slots: Vec<AvailabilitySlot> = slots.into_iter().map(Into::into).collect();
    sync::validate_slots(&slots)
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Blood types in canonical order, unknown codes last.
#[uniffi::export]
pub fn sorted_blood_types(types: Vec<FfiBloodType>) -> Vec<FfiBloodType> {
    let mut types: Vec<BloodType> = types.into_iter().map(Into::into).collect();
    models::sort_blood_types(&mut types);
    types.into_iter().map(Into::into).collect()
}

// =========================================================================
// Session Store
// =========================================================================

/// Thread-safe session persistence for FFI.
#[derive(uniffi::Object)]
pub struct SessionStore {
    db: Mutex<Database>,
}

impl SessionStore {
    /// The stored session as a domain value.
    pub fn context(&self) -> Result<Option<SessionContext>, DonorSyncError> {
        let db = self.db.lock()?;
        Ok(db.load_session()?)
    }
}

#[uniffi::export]
impl SessionStore {
    /// Get the signed-in session, if any.
    pub fn current_session(&self) -> Result<Option<FfiSession>, DonorSyncError> {
        Ok(self.context()?.map(Into::into))
    }

    /// Start a session for a user, replacing any previous one.
    pub fn sign_in(&self, user_id: i64) -> Result<FfiSession, DonorSyncError> {
        let db = self.db.lock()?;
        let session = SessionContext::new(user_id);
        db.save_session(&session)?;
        tracing::debug!(user_id, "Session started");
        Ok(session.into())
    }

    /// Attach a donor id to the current session.
    pub fn remember_donor(&self, donor_id: i64) -> Result<FfiSession, DonorSyncError> {
        let db = self.db.lock()?;
        let session = db
            .load_session()?
            .ok_or_else(|| DonorSyncError::InvalidInput("No signed-in user".into()))?
            .with_donor(donor_id);
        db.save_session(&session)?;
        Ok(session.into())
    }

    /// End the session. Returns whether one existed.
    pub fn sign_out(&self) -> Result<bool, DonorSyncError> {
        let db = self.db.lock()?;
        Ok(db.clear_session()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe blood type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBloodType {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<BloodType> for FfiBloodType {
    fn from(t: BloodType) -> Self {
        Self {
            id: t.id,
            code: t.code,
            name: t.name,
        }
    }
}

impl From<FfiBloodType> for BloodType {
    fn from(t: FfiBloodType) -> Self {
        BloodType {
            id: t.id,
            code: t.code,
            name: t.name,
        }
    }
}

/// FFI-safe health condition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthCondition {
    pub id: i64,
    pub name: String,
    pub is_donation_eligible: Option<bool>,
}

impl From<FfiHealthCondition> for HealthCondition {
    fn from(c: FfiHealthCondition) -> Self {
        HealthCondition {
            id: c.id,
            name: c.name,
            is_donation_eligible: c.is_donation_eligible,
        }
    }
}

/// FFI-safe embedded condition link.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConditionLink {
    pub condition_id: Option<i64>,
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl From<FfiConditionLink> for HealthConditionLink {
    fn from(l: FfiConditionLink) -> Self {
        HealthConditionLink {
            condition_id: l.condition_id,
            id: l.id,
            name: l.name,
        }
    }
}

/// FFI-safe availability slot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAvailabilitySlot {
    pub weekday: u8,
    pub time_from_min: u16,
    pub time_to_min: u16,
}

impl From<FfiAvailabilitySlot> for AvailabilitySlot {
    fn from(s: FfiAvailabilitySlot) -> Self {
        AvailabilitySlot::new(s.weekday, s.time_from_min, s.time_to_min)
    }
}

/// FFI-safe field validation error.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub message: String,
}

impl From<sync::FieldError> for FfiFieldError {
    fn from(e: sync::FieldError) -> Self {
        Self {
            field: e.field,
            message: e.message,
        }
    }
}

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub user_id: i64,
    pub donor_id: Option<i64>,
}

impl From<SessionContext> for FfiSession {
    fn from(s: SessionContext) -> Self {
        Self {
            user_id: s.user_id,
            donor_id: s.donor_id,
        }
    }
}
