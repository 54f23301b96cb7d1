//! Handwritten recording fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use ws_core::entity::{ActionSpec, CollectionQuery};
use ws_core::ids::{EntityId, ListId, MembershipId};
use ws_core::list::{EntityList, ListMember, NewList};
use ws_core::ports::{ApiError, EntityApiPort, ListApiPort, ModuleSourcePort};

/// REST collaborator that answers collection reads from a canned body and
/// records every call.
pub struct RecordingEntityApi {
    collection: Mutex<Value>,
    reads: Mutex<Vec<Vec<(String, String)>>>,
    deletes: Mutex<Vec<EntityId>>,
    restores: Mutex<Vec<(EntityId, Value)>>,
}

impl RecordingEntityApi {
    pub fn new(collection: Value) -> Arc<Self> {
        Arc::new(Self {
            collection: Mutex::new(collection),
            reads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            restores: Mutex::new(Vec::new()),
        })
    }

    pub fn reads(&self) -> Vec<Vec<(String, String)>> {
        self.reads.lock().unwrap().clone()
    }

    pub fn restores(&self) -> Vec<(EntityId, Value)> {
        self.restores.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<EntityId> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityApiPort for RecordingEntityApi {
    async fn fetch_collection(
        &self,
        _endpoint: &str,
        query: &CollectionQuery,
    ) -> Result<Value, ApiError> {
        self.reads.lock().unwrap().push(query.to_pairs());
        Ok(self.collection.lock().unwrap().clone())
    }

    async fn fetch_filter_options(&self, _endpoint: &str) -> Result<Value, ApiError> {
        Ok(json!({"status": ["active", "inactive"]}))
    }

    async fn fetch_source(&self, source: &str) -> Result<Value, ApiError> {
        Ok(json!({ source: [{"id": 1, "name": "Acme"}] }))
    }

    async fn create(&self, _endpoint: &str, body: &Value) -> Result<Value, ApiError> {
        Ok(body.clone())
    }

    async fn update(&self, _endpoint: &str, _id: &EntityId, body: &Value) -> Result<Value, ApiError> {
        Ok(body.clone())
    }

    async fn delete(&self, _endpoint: &str, id: &EntityId) -> Result<Option<Value>, ApiError> {
        self.deletes.lock().unwrap().push(id.clone());
        Ok(Some(json!({"deletedItem": {"id": id.as_str()}})))
    }

    async fn undo_delete(
        &self,
        _endpoint: &str,
        id: &EntityId,
        deleted_item: &Value,
    ) -> Result<(), ApiError> {
        self.restores
            .lock()
            .unwrap()
            .push((id.clone(), deleted_item.clone()));
        Ok(())
    }

    async fn invoke_action(
        &self,
        _endpoint: &str,
        _id: &EntityId,
        _action: &ActionSpec,
    ) -> Result<Value, ApiError> {
        Ok(Value::Null)
    }
}

/// List API over an in-memory membership table.
#[derive(Default)]
pub struct InMemoryListApi {
    members: Mutex<Vec<ListMember>>,
    next_membership: Mutex<u32>,
}

impl InMemoryListApi {
    pub fn with_members(ids: &[&str]) -> Arc<Self> {
        let api = Self::default();
        {
            let mut members = api.members.lock().unwrap();
            let mut next = api.next_membership.lock().unwrap();
            for id in ids {
                *next += 1;
                members.push(ListMember {
                    membership_id: MembershipId::from(format!("m{next}")),
                    entity_id: EntityId::from(*id),
                });
            }
        }
        Arc::new(api)
    }

    pub fn member_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .members
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.entity_id.to_string())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl ListApiPort for InMemoryListApi {
    async fn lists(&self, _entity_type: &str) -> Result<Vec<EntityList>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_list(&self, _list: &NewList) -> Result<EntityList, ApiError> {
        Err(ApiError::Network("unsupported".to_string()))
    }

    async fn delete_list(&self, _list_id: &ListId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn members(&self, _list_id: &ListId) -> Result<Vec<ListMember>, ApiError> {
        Ok(self.members.lock().unwrap().clone())
    }

    async fn add_members(&self, _list_id: &ListId, entity_ids: &[EntityId]) -> Result<(), ApiError> {
        let mut members = self.members.lock().unwrap();
        let mut next = self.next_membership.lock().unwrap();
        for id in entity_ids {
            *next += 1;
            members.push(ListMember {
                membership_id: MembershipId::from(format!("m{next}")),
                entity_id: id.clone(),
            });
        }
        Ok(())
    }

    async fn remove_member(
        &self,
        _list_id: &ListId,
        membership_id: &MembershipId,
    ) -> Result<(), ApiError> {
        self.members
            .lock()
            .unwrap()
            .retain(|m| &m.membership_id != membership_id);
        Ok(())
    }
}

/// Serves widget sources by URI; unknown URIs answer 404.
#[derive(Default)]
pub struct StaticSources {
    sources: HashMap<String, String>,
}

impl StaticSources {
    pub fn with(mut self, uri: &str, source: &str) -> Self {
        self.sources.insert(uri.to_string(), source.to_string());
        self
    }
}

#[async_trait]
impl ModuleSourcePort for StaticSources {
    async fn fetch_module(&self, uri: &str) -> Result<String, ApiError> {
        self.sources.get(uri).cloned().ok_or(ApiError::Status {
            status: 404,
            message: None,
        })
    }
}
