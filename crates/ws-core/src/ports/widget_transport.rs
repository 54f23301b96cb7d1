//! Transports for widget code that is not compiled into the registry.

use std::sync::Arc;

use async_trait::async_trait;

use super::errors::ApiError;
use crate::widget::WidgetComponent;

/// Outcome of appending a script element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Loaded,
    Failed(String),
}

/// Host capability to append a script that self-registers into the shared
/// external widget registry.
///
/// Appended scripts and their side effects are never retracted.
#[async_trait]
pub trait ScriptHostPort: Send + Sync {
    async fn append_script(&self, uri: &str) -> ScriptEvent;
}

/// Fetches module source text. Non-2xx responses are `ApiError::Status`.
#[async_trait]
pub trait ModuleSourcePort: Send + Sync {
    async fn fetch_module(&self, uri: &str) -> Result<String, ApiError>;
}

/// In-memory blob wrapping fetched module source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBlob {
    pub source: String,
    pub mime: &'static str,
}

impl ModuleBlob {
    pub fn javascript(source: String) -> Self {
        Self {
            source,
            mime: "application/javascript",
        }
    }
}

/// Transient object URLs for blobs. Every created URL must be revoked.
pub trait ObjectUrlPort: Send + Sync {
    fn create_object_url(&self, blob: ModuleBlob) -> String;

    fn revoke_object_url(&self, url: &str);
}

pub struct ModuleExports {
    pub default: Option<Arc<dyn WidgetComponent>>,
}

impl std::fmt::Debug for ModuleExports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleExports")
            .field("default", &self.default.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

/// Imports a module from a (blob) URL.
#[async_trait]
pub trait ModuleImporterPort: Send + Sync {
    async fn import(&self, url: &str) -> Result<ModuleExports, String>;
}
