use thiserror::Error;

use super::config::Feature;
use super::form::FormError;
use crate::list::ListSyncError;
use crate::ports::ApiError;

/// Failure of an entity engine operation.
///
/// None of these are fatal to the host: the engine keeps its previous data
/// and records the error for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A collection read failed. Retryable; previous data is kept.
    #[error("failed to load records: {0}")]
    Load(ApiError),

    #[error(transparent)]
    Validation(#[from] FormError),

    /// A write failed. Carries the server message or a generic one.
    #[error("{message}")]
    Write { message: String },

    #[error("feature {0:?} is not enabled for this entity")]
    FeatureDisabled(Feature),

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("record {0} is not on the current page")]
    RecordNotFound(crate::ids::EntityId),

    #[error("no form is open")]
    NoOpenForm,

    #[error("no records are selected")]
    EmptySelection,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    ListSync(#[from] ListSyncError),
}

impl EngineError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Load(_) | EngineError::Write { .. })
    }
}
