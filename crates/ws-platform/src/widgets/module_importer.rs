use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;
use ws_core::ports::{ModuleExports, ModuleImporterPort};
use ws_core::widget::WidgetComponent;

use super::manifest::{TemplateWidget, WidgetManifest};
use super::object_url::InMemoryObjectUrlStore;

/// Imports manifest modules from object URLs minted by [`InMemoryObjectUrlStore`].
///
/// A module is a JSON object; its `default` member is the exported widget manifest.
pub struct ManifestModuleImporter {
    urls: Arc<InMemoryObjectUrlStore>,
}

impl ManifestModuleImporter {
    pub fn new(urls: Arc<InMemoryObjectUrlStore>) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl ModuleImporterPort for ManifestModuleImporter {
    #[instrument(name = "platform.importer.import", skip(self))]
    async fn import(&self, url: &str) -> Result<ModuleExports, String> {
        let blob = self
            .urls
            .blob(url)
            .ok_or_else(|| format!("no module at {url}"))?;

        let module: Value =
            serde_json::from_str(&blob.source).map_err(|e| format!("syntax error: {e}"))?;

        let default = match module.get("default") {
            Some(manifest) => {
                let manifest =
                    WidgetManifest::from_value(manifest.clone()).map_err(|e| e.to_string())?;
                Some(Arc::new(TemplateWidget::new(manifest)) as Arc<dyn WidgetComponent>)
            }
            None => None,
        };

        Ok(ModuleExports { default })
    }
}
