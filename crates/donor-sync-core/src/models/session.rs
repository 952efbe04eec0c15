//! Session context passed explicitly to the sync layer.

use serde::{Deserialize, Serialize};

/// Who is signed in, and which donor record they own once known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: i64,
    pub donor_id: Option<i64>,
}

impl SessionContext {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            donor_id: None,
        }
    }

    pub fn with_donor(mut self, donor_id: i64) -> Self {
        self.donor_id = Some(donor_id);
        self
    }
}
