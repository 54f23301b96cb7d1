use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use ws_core::ids::{EntityId, ListId, MembershipId};
use ws_core::list::{FailedRemoval, ListSyncError, MembershipDiff, SyncReport};
use ws_core::ports::ListApiPort;

/// Reconciles a list's members against a desired set.
///
/// 将列表成员与期望集合对齐：一次批量添加，逐条删除。
///
/// Current membership is always re-read first. Additions go out in one
/// batched request; removals are one request per membership record, issued
/// concurrently and all awaited. Nothing is rolled back; the caller reloads.
pub struct ListMembershipSynchronizer {
    lists: Arc<dyn ListApiPort>,
}

impl ListMembershipSynchronizer {
    pub fn from_ports(lists: Arc<dyn ListApiPort>) -> Self {
        Self { lists }
    }

    #[tracing::instrument(
        name = "usecase.sync_list_members.execute",
        skip(self, desired),
        fields(list_id = %list_id, desired = desired.len())
    )]
    pub async fn execute(
        &self,
        list_id: &ListId,
        desired: &BTreeSet<EntityId>,
    ) -> Result<SyncReport, ListSyncError> {
        let membership = self.read_membership(list_id).await?;
        let current: BTreeSet<EntityId> = membership.keys().cloned().collect();
        let diff = MembershipDiff::compute(desired, &current);

        let mut report = SyncReport::default();
        if diff.is_empty() {
            info!("list already in sync");
            return Ok(report);
        }

        if !diff.to_add.is_empty() {
            let to_add: Vec<EntityId> = diff.to_add.iter().cloned().collect();
            self.lists
                .add_members(list_id, &to_add)
                .await
                .map_err(ListSyncError::AddMembers)?;
            report.added = to_add;
        }

        self.remove_memberships(list_id, &diff.to_remove, &membership, &mut report)
            .await;

        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            failed = report.failed_removals.len(),
            "list members synchronized"
        );
        Ok(report)
    }

    /// Adds `entity_ids` in one request. The server ignores existing members.
    #[tracing::instrument(
        name = "usecase.sync_list_members.add",
        skip(self, entity_ids),
        fields(list_id = %list_id, count = entity_ids.len())
    )]
    pub async fn add(
        &self,
        list_id: &ListId,
        entity_ids: &[EntityId],
    ) -> Result<SyncReport, ListSyncError> {
        self.lists
            .add_members(list_id, entity_ids)
            .await
            .map_err(ListSyncError::AddMembers)?;
        info!("list members added");
        Ok(SyncReport {
            added: entity_ids.to_vec(),
            ..SyncReport::default()
        })
    }

    /// Removes `entity_ids`, each by its membership record from a fresh read.
    /// Ids that are not members are skipped.
    #[tracing::instrument(
        name = "usecase.sync_list_members.remove",
        skip(self, entity_ids),
        fields(list_id = %list_id, count = entity_ids.len())
    )]
    pub async fn remove(
        &self,
        list_id: &ListId,
        entity_ids: &BTreeSet<EntityId>,
    ) -> Result<SyncReport, ListSyncError> {
        let membership = self.read_membership(list_id).await?;
        let present: BTreeSet<EntityId> = entity_ids
            .iter()
            .filter(|id| membership.contains_key(*id))
            .cloned()
            .collect();
        if present.len() < entity_ids.len() {
            debug!(skipped = entity_ids.len() - present.len(), "ids not in list");
        }

        let mut report = SyncReport::default();
        self.remove_memberships(list_id, &present, &membership, &mut report)
            .await;
        Ok(report)
    }

    async fn read_membership(
        &self,
        list_id: &ListId,
    ) -> Result<HashMap<EntityId, MembershipId>, ListSyncError> {
        let members = self
            .lists
            .members(list_id)
            .await
            .map_err(ListSyncError::ReadMembers)?;
        Ok(members
            .into_iter()
            .map(|m| (m.entity_id, m.membership_id))
            .collect())
    }

    async fn remove_memberships(
        &self,
        list_id: &ListId,
        to_remove: &BTreeSet<EntityId>,
        membership: &HashMap<EntityId, MembershipId>,
        report: &mut SyncReport,
    ) {
        let removals = to_remove.iter().filter_map(|entity_id| {
            let membership_id = membership.get(entity_id)?.clone();
            Some(async move {
                let result = self
                    .lists
                    .remove_member(list_id, &membership_id)
                    .await
                    .map_err(|e| e.to_string());
                (entity_id.clone(), result)
            })
        });

        for (entity_id, result) in join_all(removals).await {
            match result {
                Ok(()) => report.removed.push(entity_id),
                Err(message) => {
                    warn!(entity_id = %entity_id, %message, "member removal failed");
                    report.failed_removals.push(FailedRemoval { entity_id, message });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockListApi;
    use mockall::Sequence;
    use ws_core::list::ListMember;
    use ws_core::ports::ApiError;

    fn ids(values: &[&str]) -> BTreeSet<EntityId> {
        values.iter().map(|v| EntityId::from(*v)).collect()
    }

    fn member(membership: &str, entity: &str) -> ListMember {
        ListMember {
            membership_id: MembershipId::from(membership),
            entity_id: EntityId::from(entity),
        }
    }

    #[tokio::test]
    async fn adds_in_one_batch_and_removes_by_membership_id() {
        let mut api = MockListApi::new();
        let mut seq = Sequence::new();
        api.expect_members()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![member("m1", "1"), member("m2", "2"), member("m4", "4")]));
        api.expect_add_members()
            .withf(|_, ids| ids == [EntityId::from("3"), EntityId::from("5")])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        api.expect_remove_member()
            .withf(|_, m| m.as_str() == "m4")
            .times(1)
            .returning(|_, _| Ok(()));

        let report = ListMembershipSynchronizer::from_ports(Arc::new(api))
            .execute(&ListId::from("L"), &ids(&["1", "2", "3", "5"]))
            .await
            .unwrap();

        assert_eq!(report.added, vec![EntityId::from("3"), EntityId::from("5")]);
        assert_eq!(report.removed, vec![EntityId::from("4")]);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn add_failure_aborts_before_removals() {
        let mut api = MockListApi::new();
        api.expect_members()
            .returning(|_| Ok(vec![member("m1", "1")]));
        api.expect_add_members()
            .returning(|_, _| Err(ApiError::Network("down".to_string())));
        api.expect_remove_member().times(0);

        let err = ListMembershipSynchronizer::from_ports(Arc::new(api))
            .execute(&ListId::from("L"), &ids(&["2"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ListSyncError::AddMembers(_)));
    }

    #[tokio::test]
    async fn removal_failures_are_collected() {
        let mut api = MockListApi::new();
        api.expect_members()
            .returning(|_| Ok(vec![member("m1", "1"), member("m2", "2")]));
        api.expect_remove_member()
            .times(2)
            .returning(|_, m| {
                if m.as_str() == "m1" {
                    Err(ApiError::Status { status: 500, message: None })
                } else {
                    Ok(())
                }
            });

        let report = ListMembershipSynchronizer::from_ports(Arc::new(api))
            .execute(&ListId::from("L"), &BTreeSet::new())
            .await
            .unwrap();

        assert_eq!(report.removed, vec![EntityId::from("2")]);
        assert_eq!(report.failed_ids(), vec![&EntityId::from("1")]);
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn in_sync_list_issues_no_writes() {
        let mut api = MockListApi::new();
        api.expect_members()
            .returning(|_| Ok(vec![member("m1", "1")]));
        api.expect_add_members().times(0);
        api.expect_remove_member().times(0);

        let report = ListMembershipSynchronizer::from_ports(Arc::new(api))
            .execute(&ListId::from("L"), &ids(&["1"]))
            .await
            .unwrap();
        assert_eq!(report, SyncReport::default());
    }

    #[tokio::test]
    async fn remove_reads_fresh_members_and_skips_non_members() {
        let mut api = MockListApi::new();
        api.expect_members()
            .times(1)
            .returning(|_| Ok(vec![member("m1", "1"), member("m2", "2")]));
        api.expect_remove_member()
            .withf(|_, m| m.as_str() == "m2")
            .times(1)
            .returning(|_, _| Ok(()));

        let report = ListMembershipSynchronizer::from_ports(Arc::new(api))
            .remove(&ListId::from("L"), &ids(&["2", "9"]))
            .await
            .unwrap();
        assert_eq!(report.removed, vec![EntityId::from("2")]);
    }

    #[tokio::test]
    async fn read_failure_changes_nothing() {
        let mut api = MockListApi::new();
        api.expect_members()
            .returning(|_| Err(ApiError::Network("down".to_string())));
        api.expect_add_members().times(0);

        let err = ListMembershipSynchronizer::from_ports(Arc::new(api))
            .execute(&ListId::from("L"), &ids(&["1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ListSyncError::ReadMembers(_)));
    }
}
