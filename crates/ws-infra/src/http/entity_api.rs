use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::instrument;
use ws_core::entity::{ActionMethod, ActionSpec, CollectionQuery};
use ws_core::ids::EntityId;
use ws_core::ports::{ApiError, EntityApiPort};

use super::client::RestClient;

/// `EntityApiPort` over the `/api/{endpoint}` REST resources.
pub struct HttpEntityApi {
    client: RestClient,
}

impl HttpEntityApi {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityApiPort for HttpEntityApi {
    #[instrument(name = "http.entity.fetch_collection", skip(self, query), fields(page = query.page))]
    async fn fetch_collection(
        &self,
        endpoint: &str,
        query: &CollectionQuery,
    ) -> Result<Value, ApiError> {
        let mut url = self.client.api_url(&[endpoint])?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        self.client
            .send_json_required(self.client.request(Method::GET, url))
            .await
    }

    async fn fetch_filter_options(&self, endpoint: &str) -> Result<Value, ApiError> {
        let url = self.client.api_url(&[endpoint, "filter-options"])?;
        self.client
            .send_json_required(self.client.request(Method::GET, url))
            .await
    }

    async fn fetch_source(&self, source: &str) -> Result<Value, ApiError> {
        let url = self.client.api_url(&[source])?;
        self.client
            .send_json_required(self.client.request(Method::GET, url))
            .await
    }

    #[instrument(name = "http.entity.create", skip(self, body))]
    async fn create(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.client.api_url(&[endpoint])?;
        let body = self
            .client
            .send_json(self.client.request(Method::POST, url).json(body))
            .await?;
        Ok(body.unwrap_or(Value::Null))
    }

    #[instrument(name = "http.entity.update", skip(self, body), fields(id = %id))]
    async fn update(
        &self,
        endpoint: &str,
        id: &EntityId,
        body: &Value,
    ) -> Result<Value, ApiError> {
        let url = self.client.api_url(&[endpoint, id.as_str()])?;
        let body = self
            .client
            .send_json(self.client.request(Method::PUT, url).json(body))
            .await?;
        Ok(body.unwrap_or(Value::Null))
    }

    #[instrument(name = "http.entity.delete", skip(self), fields(id = %id))]
    async fn delete(&self, endpoint: &str, id: &EntityId) -> Result<Option<Value>, ApiError> {
        let url = self.client.api_url(&[endpoint, id.as_str()])?;
        self.client
            .send_json(self.client.request(Method::DELETE, url))
            .await
    }

    #[instrument(name = "http.entity.undo_delete", skip(self, deleted_item), fields(id = %id))]
    async fn undo_delete(
        &self,
        endpoint: &str,
        id: &EntityId,
        deleted_item: &Value,
    ) -> Result<(), ApiError> {
        let url = self.client.api_url(&[endpoint, id.as_str(), "undo"])?;
        self.client
            .send_json(
                self.client
                    .request(Method::POST, url)
                    .json(&json!({ "deletedItem": deleted_item })),
            )
            .await?;
        Ok(())
    }

    #[instrument(name = "http.entity.invoke_action", skip(self, action), fields(id = %id, action = %action.key))]
    async fn invoke_action(
        &self,
        endpoint: &str,
        id: &EntityId,
        action: &ActionSpec,
    ) -> Result<Value, ApiError> {
        let url = self.client.api_url(&[endpoint, id.as_str(), &action.path])?;
        let method = match action.method {
            ActionMethod::Post => Method::POST,
            ActionMethod::Put => Method::PUT,
        };
        let body = self
            .client
            .send_json(self.client.request(method, url))
            .await?;
        Ok(body.unwrap_or(Value::Null))
    }
}
