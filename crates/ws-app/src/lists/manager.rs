use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use ws_core::ids::{EntityId, ListId};
use ws_core::list::{EntityList, ListKind, NewList, SyncReport};
use ws_core::ports::ListApiPort;

use super::synchronizer::ListMembershipSynchronizer;

/// Saved-list management for one entity type.
/// 某一实体类型的列表管理。
pub struct ListManager {
    entity_type: String,
    lists: Arc<dyn ListApiPort>,
    synchronizer: ListMembershipSynchronizer,
}

impl ListManager {
    pub fn from_ports(entity_type: impl Into<String>, lists: Arc<dyn ListApiPort>) -> Self {
        Self {
            entity_type: entity_type.into(),
            synchronizer: ListMembershipSynchronizer::from_ports(lists.clone()),
            lists,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    #[tracing::instrument(name = "usecase.list_manager.lists", skip(self), fields(entity_type = %self.entity_type))]
    pub async fn lists(&self) -> Result<Vec<EntityList>> {
        self.lists
            .lists(&self.entity_type)
            .await
            .with_context(|| format!("Failed to load lists for {}", self.entity_type))
    }

    #[tracing::instrument(name = "usecase.list_manager.create", skip(self), fields(entity_type = %self.entity_type))]
    pub async fn create(&self, name: &str, kind: ListKind) -> Result<EntityList> {
        let name = name.trim();
        anyhow::ensure!(!name.is_empty(), "List name must not be empty");

        let list = self
            .lists
            .create_list(&NewList {
                name: name.to_string(),
                entity_type: self.entity_type.clone(),
                kind,
            })
            .await
            .with_context(|| format!("Failed to create list {name}"))?;
        info!(list_id = %list.id, "list created");
        Ok(list)
    }

    #[tracing::instrument(name = "usecase.list_manager.delete", skip(self))]
    pub async fn delete(&self, list_id: &ListId) -> Result<()> {
        self.lists
            .delete_list(list_id)
            .await
            .with_context(|| format!("Failed to delete list {list_id}"))?;
        info!(list_id = %list_id, "list deleted");
        Ok(())
    }

    /// Entity ids currently in the list, from a fresh read.
    pub async fn member_ids(&self, list_id: &ListId) -> Result<BTreeSet<EntityId>> {
        let members = self
            .lists
            .members(list_id)
            .await
            .with_context(|| format!("Failed to load members of list {list_id}"))?;
        Ok(members.into_iter().map(|m| m.entity_id).collect())
    }

    /// Makes the list's members exactly `desired`.
    pub async fn sync_members(
        &self,
        list_id: &ListId,
        desired: &BTreeSet<EntityId>,
    ) -> Result<SyncReport> {
        Ok(self.synchronizer.execute(list_id, desired).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockListApi;
    use ws_core::list::ListMember;
    use ws_core::ids::MembershipId;

    #[tokio::test]
    async fn create_trims_and_scopes_to_entity_type() {
        let mut api = MockListApi::new();
        api.expect_create_list()
            .withf(|list| list.name == "VIPs" && list.entity_type == "contacts")
            .times(1)
            .returning(|list| {
                Ok(EntityList {
                    id: ListId::from("1"),
                    name: list.name.clone(),
                    entity_type: list.entity_type.clone(),
                    kind: list.kind,
                    member_count: Some(0),
                })
            });

        let manager = ListManager::from_ports("contacts", Arc::new(api));
        let list = manager.create("  VIPs ", ListKind::Static).await.unwrap();
        assert_eq!(list.id, ListId::from("1"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_a_call() {
        let mut api = MockListApi::new();
        api.expect_create_list().times(0);
        let manager = ListManager::from_ports("contacts", Arc::new(api));
        assert!(manager.create("  ", ListKind::Static).await.is_err());
    }

    #[tokio::test]
    async fn member_ids_collects_entity_ids() {
        let mut api = MockListApi::new();
        api.expect_members().returning(|_| {
            Ok(vec![ListMember {
                membership_id: MembershipId::from("m1"),
                entity_id: EntityId::from("4"),
            }])
        });
        let manager = ListManager::from_ports("contacts", Arc::new(api));
        let ids = manager.member_ids(&ListId::from("1")).await.unwrap();
        assert!(ids.contains(&EntityId::from("4")));
    }
}
