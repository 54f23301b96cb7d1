use async_trait::async_trait;

use super::errors::ApiError;
use crate::ids::{EntityId, ListId, MembershipId};
use crate::list::{EntityList, ListMember, NewList};

#[async_trait]
pub trait ListApiPort: Send + Sync {
    async fn lists(&self, entity_type: &str) -> Result<Vec<EntityList>, ApiError>;

    async fn create_list(&self, list: &NewList) -> Result<EntityList, ApiError>;

    async fn delete_list(&self, list_id: &ListId) -> Result<(), ApiError>;

    async fn members(&self, list_id: &ListId) -> Result<Vec<ListMember>, ApiError>;

    /// Adds all ids in one request. The server ignores duplicates.
    async fn add_members(&self, list_id: &ListId, entity_ids: &[EntityId])
        -> Result<(), ApiError>;

    /// Removes one membership record. There is no batch endpoint.
    async fn remove_member(
        &self,
        list_id: &ListId,
        membership_id: &MembershipId,
    ) -> Result<(), ApiError>;
}
