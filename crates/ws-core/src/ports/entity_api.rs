use async_trait::async_trait;
use serde_json::Value;

use super::errors::ApiError;
use crate::entity::{ActionSpec, CollectionQuery};
use crate::ids::EntityId;

/// REST collaborator for entity collections. One resource per endpoint.
///
/// Bodies are returned raw; response-shape adaptation is the caller's job.
#[async_trait]
pub trait EntityApiPort: Send + Sync {
    /// `GET /api/{endpoint}?…`
    async fn fetch_collection(
        &self,
        endpoint: &str,
        query: &CollectionQuery,
    ) -> Result<Value, ApiError>;

    /// `GET /api/{endpoint}/filter-options`
    async fn fetch_filter_options(&self, endpoint: &str) -> Result<Value, ApiError>;

    /// `GET /api/{source}` for dropdown data.
    async fn fetch_source(&self, source: &str) -> Result<Value, ApiError>;

    async fn create(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError>;

    async fn update(&self, endpoint: &str, id: &EntityId, body: &Value)
        -> Result<Value, ApiError>;

    /// Returns the response body, if any. It may carry `deletedItem`.
    async fn delete(&self, endpoint: &str, id: &EntityId) -> Result<Option<Value>, ApiError>;

    /// `POST /api/{endpoint}/{id}/undo` with `{deletedItem}`.
    async fn undo_delete(
        &self,
        endpoint: &str,
        id: &EntityId,
        deleted_item: &Value,
    ) -> Result<(), ApiError>;

    async fn invoke_action(
        &self,
        endpoint: &str,
        id: &EntityId,
        action: &ActionSpec,
    ) -> Result<Value, ApiError>;
}
