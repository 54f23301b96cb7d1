use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use ws_core::ports::{ModuleSourcePort, ScriptEvent, ScriptHostPort};
use ws_core::widget::ExternalWidgetRegistry;

use super::manifest::{TemplateWidget, WidgetManifest};

/// Body of an uploaded widget script: the widgets it registers, by key.
#[derive(Debug, Deserialize)]
struct RegistrationScript {
    register: serde_json::Map<String, Value>,
}

/// Script host that executes uploaded registration scripts.
///
/// 脚本宿主：获取上传的注册脚本并写入共享的外部组件注册表。
///
/// A script is fetched and every widget it declares is registered into the
/// shared registry. Registrations are never rolled back, even when the
/// loader later finds the key it wanted missing.
pub struct RegistrationScriptHost {
    source: Arc<dyn ModuleSourcePort>,
    registry: ExternalWidgetRegistry,
}

impl RegistrationScriptHost {
    pub fn new(source: Arc<dyn ModuleSourcePort>, registry: ExternalWidgetRegistry) -> Self {
        Self { source, registry }
    }
}

#[async_trait]
impl ScriptHostPort for RegistrationScriptHost {
    #[instrument(name = "platform.script_host.append", skip(self))]
    async fn append_script(&self, uri: &str) -> ScriptEvent {
        let text = match self.source.fetch_module(uri).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "script fetch failed");
                return ScriptEvent::Failed(err.to_string());
            }
        };

        let script: RegistrationScript = match serde_json::from_str(&text) {
            Ok(script) => script,
            Err(err) => {
                warn!(error = %err, "script evaluation failed");
                return ScriptEvent::Failed(format!("script error: {err}"));
            }
        };

        for (key, manifest) in script.register {
            match WidgetManifest::from_value(manifest) {
                Ok(manifest) => {
                    if self
                        .registry
                        .register(key.clone(), Arc::new(TemplateWidget::new(manifest)))
                        .is_some()
                    {
                        info!(%key, "external widget re-registered");
                    } else {
                        info!(%key, "external widget registered");
                    }
                }
                Err(err) => warn!(%key, error = %err, "skipping invalid registration"),
            }
        }

        ScriptEvent::Loaded
    }
}
