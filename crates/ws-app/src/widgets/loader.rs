//! Loading of widgets whose code is not compiled into the shell.

use std::sync::Arc;

use tracing::{debug, info, warn};
use ws_core::ports::{
    ModuleBlob, ModuleImporterPort, ModuleSourcePort, ObjectUrlPort, ScriptEvent, ScriptHostPort,
};
use ws_core::widget::{ExternalWidgetRegistry, WidgetComponent};
use ws_core::WidgetLoadError;

/// Loads external widgets through one of two transports.
///
/// 加载外部组件：脚本注入或模块导入。
///
/// Each call is a single attempt. Scripts and their registrations are never
/// rolled back; the only resource released is the transient object URL of
/// the module strategy.
pub struct ExternalWidgetLoader {
    registry: ExternalWidgetRegistry,
    scripts: Arc<dyn ScriptHostPort>,
    sources: Arc<dyn ModuleSourcePort>,
    object_urls: Arc<dyn ObjectUrlPort>,
    importer: Arc<dyn ModuleImporterPort>,
}

impl ExternalWidgetLoader {
    pub fn from_ports(
        registry: ExternalWidgetRegistry,
        scripts: Arc<dyn ScriptHostPort>,
        sources: Arc<dyn ModuleSourcePort>,
        object_urls: Arc<dyn ObjectUrlPort>,
        importer: Arc<dyn ModuleImporterPort>,
    ) -> Self {
        Self {
            registry,
            scripts,
            sources,
            object_urls,
            importer,
        }
    }

    pub fn registry(&self) -> &ExternalWidgetRegistry {
        &self.registry
    }

    /// Appends the script at `uri` and expects it to register `key`.
    #[tracing::instrument(name = "usecase.load_widget.script", skip(self))]
    pub async fn load_script(
        &self,
        key: &str,
        uri: &str,
    ) -> Result<Arc<dyn WidgetComponent>, WidgetLoadError> {
        match self.scripts.append_script(uri).await {
            ScriptEvent::Loaded => match self.registry.get(key) {
                Some(component) => {
                    info!("uploaded widget registered");
                    Ok(component)
                }
                None => {
                    warn!(registered = ?self.registry.keys(), "script loaded without registering its key");
                    Err(WidgetLoadError::NotFoundInGlobalScope(key.to_string()))
                }
            },
            ScriptEvent::Failed(reason) => {
                warn!(%reason, "widget script failed");
                Err(WidgetLoadError::ScriptFailed(reason))
            }
        }
    }

    /// Fetches module source from `uri`, imports it through a transient
    /// object URL and returns its default export.
    ///
    /// The object URL is revoked exactly once whatever the import does.
    #[tracing::instrument(name = "usecase.load_widget.module", skip(self))]
    pub async fn load_module(&self, uri: &str) -> Result<Arc<dyn WidgetComponent>, WidgetLoadError> {
        let source = self.sources.fetch_module(uri).await?;
        let url = ObjectUrl::create(self.object_urls.clone(), ModuleBlob::javascript(source));

        let imported = self.importer.import(url.as_str()).await;
        url.revoke();

        let exports = imported.map_err(|err| {
            warn!(error = %err, "widget module import failed");
            WidgetLoadError::Import(err)
        })?;
        match exports.default {
            Some(component) => {
                info!(name = component.name(), "fetched widget imported");
                Ok(component)
            }
            None => Err(WidgetLoadError::MissingDefaultExport),
        }
    }
}

/// Object URL revoked when dropped, so an early return or a cancelled load
/// still releases it.
struct ObjectUrl {
    port: Arc<dyn ObjectUrlPort>,
    url: String,
}

impl ObjectUrl {
    fn create(port: Arc<dyn ObjectUrlPort>, blob: ModuleBlob) -> Self {
        let url = port.create_object_url(blob);
        debug!(%url, "object url created");
        Self { port, url }
    }

    fn as_str(&self) -> &str {
        &self.url
    }

    fn revoke(self) {
        drop(self);
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.port.revoke_object_url(&self.url);
        debug!(url = %self.url, "object url revoked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        CountingObjectUrls, ScriptedHost, StaticModuleSource, StubImporter,
    };
    use ws_core::ports::ApiError;

    fn loader(
        registry: &ExternalWidgetRegistry,
        scripts: ScriptedHost,
        source: Result<String, ApiError>,
        urls: &Arc<CountingObjectUrls>,
        importer: StubImporter,
    ) -> ExternalWidgetLoader {
        ExternalWidgetLoader::from_ports(
            registry.clone(),
            Arc::new(scripts),
            Arc::new(StaticModuleSource(source)),
            urls.clone(),
            Arc::new(importer),
        )
    }

    fn scripts(registry: &ExternalWidgetRegistry, registers: Option<&'static str>) -> ScriptedHost {
        ScriptedHost {
            registry: registry.clone(),
            registers,
            failure: None,
        }
    }

    #[tokio::test]
    async fn script_that_registers_its_key_succeeds() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = loader(
            &registry,
            scripts(&registry, Some("weather")),
            Ok(String::new()),
            &urls,
            StubImporter::NoDefault,
        );

        let component = loader.load_script("weather", "/w/weather.js").await.unwrap();
        assert_eq!(component.name(), "weather");
    }

    #[tokio::test]
    async fn script_registering_another_key_is_not_found() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = loader(
            &registry,
            scripts(&registry, Some("other")),
            Ok(String::new()),
            &urls,
            StubImporter::NoDefault,
        );

        let err = loader.load_script("weather", "/w/weather.js").await.err();
        assert_eq!(
            err,
            Some(WidgetLoadError::NotFoundInGlobalScope("weather".to_string()))
        );
        // The stray registration stays.
        assert!(registry.contains("other"));
    }

    #[tokio::test]
    async fn failed_script_reports_reason() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let host = ScriptedHost {
            registry: registry.clone(),
            registers: None,
            failure: Some("404"),
        };
        let loader = loader(&registry, host, Ok(String::new()), &urls, StubImporter::NoDefault);

        assert_eq!(
            loader.load_script("weather", "/w/weather.js").await.err(),
            Some(WidgetLoadError::ScriptFailed("404".to_string()))
        );
    }

    #[tokio::test]
    async fn module_url_is_revoked_once_on_success() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = loader(
            &registry,
            scripts(&registry, None),
            Ok("{}".to_string()),
            &urls,
            StubImporter::Default("chart"),
        );

        let component = loader.load_module("/w/chart.js").await.unwrap();
        assert_eq!(component.name(), "chart");
        assert_eq!(urls.created().len(), 1);
        assert_eq!(urls.revoked(), urls.created());
    }

    #[tokio::test]
    async fn module_url_is_revoked_once_on_import_failure() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = loader(
            &registry,
            scripts(&registry, None),
            Ok("{}".to_string()),
            &urls,
            StubImporter::Fails("syntax error"),
        );

        let err = loader.load_module("/w/chart.js").await.err();
        assert_eq!(err, Some(WidgetLoadError::Import("syntax error".to_string())));
        assert_eq!(urls.revoked(), urls.created());
        assert_eq!(urls.revoked().len(), 1);
    }

    #[tokio::test]
    async fn module_without_default_export_fails_after_revoking() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = loader(
            &registry,
            scripts(&registry, None),
            Ok("{}".to_string()),
            &urls,
            StubImporter::NoDefault,
        );

        assert_eq!(
            loader.load_module("/w/chart.js").await.err(),
            Some(WidgetLoadError::MissingDefaultExport)
        );
        assert_eq!(urls.revoked().len(), 1);
    }

    #[tokio::test]
    async fn http_status_is_reported_without_creating_a_url() {
        let registry = ExternalWidgetRegistry::new();
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = loader(
            &registry,
            scripts(&registry, None),
            Err(ApiError::Status {
                status: 404,
                message: None,
            }),
            &urls,
            StubImporter::NoDefault,
        );

        assert_eq!(
            loader.load_module("/w/chart.js").await.err(),
            Some(WidgetLoadError::HttpStatus(404))
        );
        assert!(urls.created().is_empty());
    }
}
