use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;
use ws_core::ports::{ApiError, ModuleSourcePort};

use super::client::RestClient;

/// Fetches widget module source text. Relative URIs resolve against the API origin.
pub struct HttpModuleSource {
    client: RestClient,
}

impl HttpModuleSource {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModuleSourcePort for HttpModuleSource {
    #[instrument(name = "http.module.fetch", skip(self))]
    async fn fetch_module(&self, uri: &str) -> Result<String, ApiError> {
        let url = self.client.resolve(uri)?;
        self.client
            .send_text(self.client.request(Method::GET, url))
            .await
    }
}
