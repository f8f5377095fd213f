//! Batch operation results.

use serde::{Deserialize, Serialize};

use super::record::UserRecord;

/// One batch entry that was not written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Position of the entry in the request.
    pub index: usize,
    /// Requested user id, when the entry carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Error code of the failure.
    pub code: String,
    /// Human-readable reason.
    pub error: String,
}

/// Result of a batch write. Entries are independent: `created` holds every
/// entry that was stored, `failed` every entry that was not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchWriteOutcome {
    pub created: Vec<UserRecord>,
    pub failed: Vec<BatchFailure>,
}

impl BatchWriteOutcome {
    /// Number of entries in the request.
    pub fn total(&self) -> usize {
        self.created.len() + self.failed.len()
    }

    /// Whether every entry was stored.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a batch read: latest versions found, and the ids with no record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReadOutcome {
    pub found: Vec<UserRecord>,
    pub not_found: Vec<String>,
}

impl BatchReadOutcome {
    pub fn total_requested(&self) -> usize {
        self.found.len() + self.not_found.len()
    }
}
