use serde::Serialize;
use thiserror::Error;

use crate::ids::EntityId;
use crate::ports::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListSyncError {
    /// Current members could not be read; nothing was changed.
    #[error("failed to read list members: {0}")]
    ReadMembers(ApiError),

    /// The batched add failed; removals were not attempted.
    #[error("failed to add list members: {0}")]
    AddMembers(ApiError),
}

/// Outcome of one reconciliation. Removal failures are collected, not rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub added: Vec<EntityId>,
    pub removed: Vec<EntityId>,
    pub failed_removals: Vec<FailedRemoval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRemoval {
    pub entity_id: EntityId,
    pub message: String,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed_removals.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<&EntityId> {
        self.failed_removals.iter().map(|f| &f.entity_id).collect()
    }
}
