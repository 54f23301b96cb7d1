use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::instrument;
use ws_core::ids::{EntityId, ListId, MembershipId};
use ws_core::list::{EntityList, ListMember, NewList};
use ws_core::ports::{ApiError, ListApiPort};

use super::client::RestClient;

/// `ListApiPort` over `/api/lists`.
pub struct HttpListApi {
    client: RestClient,
}

impl HttpListApi {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

/// Accepts a bare array or an object wrapping it under one of `keys`.
fn unwrap_array<T: DeserializeOwned>(body: Value, keys: &[&str]) -> Result<Vec<T>, ApiError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => keys
            .iter()
            .find_map(|k| match map.remove(*k) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ApiError::Decode(format!("expected an array under {keys:?}")))?,
        other => return Err(ApiError::Decode(format!("expected an array, got {other}"))),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string())))
        .collect()
}

/// Accepts a bare object or one wrapped under `list`/`data`.
fn unwrap_object<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let inner = match body {
        Value::Object(ref map) => ["list", "data"]
            .iter()
            .find_map(|k| map.get(*k).filter(|v| v.is_object()).cloned())
            .unwrap_or(body),
        other => other,
    };
    serde_json::from_value(inner).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl ListApiPort for HttpListApi {
    #[instrument(name = "http.lists.lists", skip(self))]
    async fn lists(&self, entity_type: &str) -> Result<Vec<EntityList>, ApiError> {
        let mut url = self.client.api_url(&["lists"])?;
        url.query_pairs_mut().append_pair("entityType", entity_type);
        let body = self
            .client
            .send_json_required(self.client.request(Method::GET, url))
            .await?;
        unwrap_array(body, &["lists", "data"])
    }

    #[instrument(name = "http.lists.create", skip(self, list), fields(name = %list.name))]
    async fn create_list(&self, list: &NewList) -> Result<EntityList, ApiError> {
        let url = self.client.api_url(&["lists"])?;
        let body = self
            .client
            .send_json_required(self.client.request(Method::POST, url).json(list))
            .await?;
        unwrap_object(body)
    }

    #[instrument(name = "http.lists.delete", skip(self), fields(list_id = %list_id))]
    async fn delete_list(&self, list_id: &ListId) -> Result<(), ApiError> {
        let url = self.client.api_url(&["lists", list_id.as_str()])?;
        self.client
            .send_json(self.client.request(Method::DELETE, url))
            .await?;
        Ok(())
    }

    #[instrument(name = "http.lists.members", skip(self), fields(list_id = %list_id))]
    async fn members(&self, list_id: &ListId) -> Result<Vec<ListMember>, ApiError> {
        let url = self.client.api_url(&["lists", list_id.as_str(), "members"])?;
        let body = self
            .client
            .send_json_required(self.client.request(Method::GET, url))
            .await?;
        unwrap_array(body, &["members", "data"])
    }

    #[instrument(name = "http.lists.add_members", skip(self, entity_ids), fields(list_id = %list_id, count = entity_ids.len()))]
    async fn add_members(
        &self,
        list_id: &ListId,
        entity_ids: &[EntityId],
    ) -> Result<(), ApiError> {
        let url = self.client.api_url(&["lists", list_id.as_str(), "members"])?;
        self.client
            .send_json(
                self.client
                    .request(Method::POST, url)
                    .json(&json!({ "entityIds": entity_ids })),
            )
            .await?;
        Ok(())
    }

    #[instrument(name = "http.lists.remove_member", skip(self), fields(list_id = %list_id, membership_id = %membership_id))]
    async fn remove_member(
        &self,
        list_id: &ListId,
        membership_id: &MembershipId,
    ) -> Result<(), ApiError> {
        let url = self.client.api_url(&[
            "lists",
            list_id.as_str(),
            "members",
            membership_id.as_str(),
        ])?;
        self.client
            .send_json(self.client.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}
