use serde::{Deserialize, Serialize};

/// Display status of a dashboard entity, derived from the upstream
/// `is_active` flag at the view-model boundary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
    Suspended,
}

impl From<bool> for EntityStatus {
    fn from(is_active: bool) -> Self {
        if is_active {
            EntityStatus::Active
        } else {
            EntityStatus::Inactive
        }
    }
}

impl EntityStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, EntityStatus::Active)
    }
}

/// Generic status/message payload the upstream returns from side actions
/// (test-connection probes, deletes).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
