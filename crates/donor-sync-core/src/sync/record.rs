//! Loading the signed-in user's donor record.

use crate::api::{ApiError, DonorApi};
use crate::models::DonorRecord;

use super::{settle, SyncError};

/// Result of a record load.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// No donor record yet. A valid state, not an error.
    NotRegistered,
    Registered(DonorRecord),
}

/// Reads the donor record, falling back to get-by-id when the primary
/// read comes back without nested collections.
pub struct RecordLoader<'a, A> {
    api: &'a A,
}

impl<'a, A: DonorApi> RecordLoader<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn load(&self) -> Result<RecordOutcome, SyncError> {
        tracing::debug!("Loading donor record");

        let response = match self.api.get_my_donor().await {
            Ok(Some(response)) => response,
            Ok(None) | Err(ApiError::NotFound) => return Ok(RecordOutcome::NotRegistered),
            Err(err) => return Err(SyncError::from_api(err)),
        };

        // A successful envelope without a payload is also "not registered".
        if response.success && response.data.is_none() {
            return Ok(RecordOutcome::NotRegistered);
        }

        let record = settle(Ok(response))?;
        if !record.has_sparse_collections() {
            return Ok(RecordOutcome::Registered(record));
        }

        Ok(RecordOutcome::Registered(self.fill_sparse(record).await))
    }

    // Keep the primary record unless the fallback actually carries the
    // nested collections.
    async fn fill_sparse(&self, primary: DonorRecord) -> DonorRecord {
        let donor_id = primary.donor_id;
        tracing::debug!(donor_id, "Primary read missing nested collections, trying get-by-id");

        match settle(self.api.get_donor_by_id(donor_id).await) {
            Ok(fallback) if !fallback.has_sparse_collections() => fallback,
            Ok(_) => {
                tracing::debug!(donor_id, "Fallback read also sparse, keeping primary");
                primary
            }
            Err(err) => {
                tracing::warn!(donor_id, error = %err, "Fallback read failed, keeping primary");
                primary
            }
        }
    }
}
