//! Service contracts for the remote donor backend.
//!
//! The transport itself lives in the host; this module only fixes the
//! shapes the sync layer consumes.

mod envelope;

pub use envelope::*;

use thiserror::Error;

use crate::models::{
    BloodType, DonorRecord, HealthCondition, ReadyStatusPayload, RegisterDonorPayload,
    UpdateDonorPayload,
};

/// Transport-level failures reported by a [`DonorApi`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 404. For `get_my_donor` this means "not registered yet".
    #[error("Not found")]
    NotFound,

    #[error("HTTP {code}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { code: u16, message: Option<String> },

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl ApiError {
    /// Message the backend attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The donor backend, one method per endpoint.
///
/// Futures are driven by the host's executor; nothing here requires `Send`.
#[allow(async_fn_in_trait)]
pub trait DonorApi {
    async fn get_blood_types(&self) -> ApiResult<ApiResponse<Vec<BloodType>>>;

    async fn get_health_conditions(&self) -> ApiResult<ApiResponse<Vec<HealthCondition>>>;

    /// `Ok(None)` or `Err(ApiError::NotFound)` both mean "not registered".
    async fn get_my_donor(&self) -> ApiResult<Option<ApiResponse<DonorRecord>>>;

    async fn get_donor_by_id(&self, donor_id: i64) -> ApiResult<ApiResponse<DonorRecord>>;

    async fn register_donor(
        &self,
        payload: &RegisterDonorPayload,
    ) -> ApiResult<ApiResponse<DonorRecord>>;

    async fn update_my_donor(
        &self,
        donor_id: i64,
        payload: &UpdateDonorPayload,
    ) -> ApiResult<ApiResponse<DonorRecord>>;

    async fn update_ready_status(
        &self,
        donor_id: i64,
        payload: &ReadyStatusPayload,
    ) -> ApiResult<ApiResponse<DonorRecord>>;
}
