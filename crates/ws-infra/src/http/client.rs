//! Shared reqwest client for the REST collaborator.
//!
//! All requests are credentialed: the client keeps a cookie store and, when
//! configured, sends a fixed session cookie header.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use ws_core::config::ApiConfig;
use ws_core::ports::ApiError;

#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid api base_url: {}", config.base_url))?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(cookie).context("Invalid session_cookie header")?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `/api/<segments...>` against the base URL. Segments are
    /// percent-encoded individually.
    pub fn api_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Network(format!("base url cannot be a base: {}", self.base_url)))?;
            path.pop_if_empty().push("api");
            for segment in segments {
                for part in segment.split('/').filter(|p| !p.is_empty()) {
                    path.push(part);
                }
            }
        }
        Ok(url)
    }

    /// Resolves a widget URI. Absolute URIs are used as-is.
    pub fn resolve(&self, uri: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(uri)
            .map_err(|e| ApiError::Network(format!("invalid uri {uri}: {e}")))
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "http request");
        self.client.request(method, url)
    }

    /// Sends the request and returns the JSON body, `None` for an empty body.
    pub async fn send_json(&self, request: RequestBuilder) -> Result<Option<Value>, ApiError> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`send_json`](Self::send_json) but an empty body is a decode error.
    pub async fn send_json_required(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        self.send_json(request)
            .await?
            .ok_or_else(|| ApiError::Decode("empty response body".to_string()))
    }

    pub async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        self.send(request)
            .await?
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        warn!(status = status.as_u16(), message = ?message, "request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Extracts the `message` or `error` field of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
