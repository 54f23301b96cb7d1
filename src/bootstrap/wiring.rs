//! # Dependency Wiring / 依赖注入
//!
//! Builds [`AppDeps`] from the infrastructure and platform adapters.
//! 从基础设施与平台适配器构造 `AppDeps`。
//!
//! This is the only place that names concrete adapter types. Everything past
//! this point sees ports.

use std::sync::Arc;

use ws_app::AppDeps;
use ws_core::config::ShellConfig;
use ws_core::ports::{HostSignalPort, ModuleSourcePort, ProfileNavigatorPort};
use ws_core::widget::ExternalWidgetRegistry;
use ws_infra::{HttpEntityApi, HttpListApi, HttpModuleSource, RestClient, SystemClock, TokioScheduler};
use ws_platform::{InMemoryObjectUrlStore, ManifestModuleImporter, RegistrationScriptHost};

/// Host side of the wiring: where widget signals and profile navigation go.
/// 宿主端：组件信号与资料页导航的去向。
pub struct HostPorts {
    pub signals: Arc<dyn HostSignalPort>,
    pub navigator: Arc<dyn ProfileNavigatorPort>,
}

impl HostPorts {
    /// Logs every signal; used when no container is attached.
    pub fn tracing() -> Self {
        let host = Arc::new(ws_platform::TracingHost);
        Self {
            signals: host.clone(),
            navigator: host,
        }
    }

    /// Forwards every signal to `host`'s receiver.
    pub fn channel(host: ws_platform::ChannelHost) -> Self {
        let host = Arc::new(host);
        Self {
            signals: host.clone(),
            navigator: host,
        }
    }
}

/// Wire every port the use cases need.
///
/// # Errors / 错误
///
/// Fails only when the REST client cannot be built from `[api]`.
pub fn wire_dependencies(config: &ShellConfig, host: HostPorts) -> anyhow::Result<AppDeps> {
    let client = RestClient::from_config(&config.api)?;
    tracing::debug!(base_url = %client.base_url(), "rest client ready");

    let module_source: Arc<dyn ModuleSourcePort> = Arc::new(HttpModuleSource::new(client.clone()));
    let external_registry = ExternalWidgetRegistry::new();
    let object_urls = Arc::new(InMemoryObjectUrlStore::new());

    Ok(AppDeps {
        entity_api: Arc::new(HttpEntityApi::new(client.clone())),
        list_api: Arc::new(HttpListApi::new(client)),
        script_host: Arc::new(RegistrationScriptHost::new(
            module_source.clone(),
            external_registry.clone(),
        )),
        external_registry,
        module_source,
        module_importer: Arc::new(ManifestModuleImporter::new(object_urls.clone())),
        object_urls,
        host_signals: host.signals,
        navigator: host.navigator,
        scheduler: Arc::new(TokioScheduler::new()),
        clock: Arc::new(SystemClock),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_is_reported() {
        let mut config = ShellConfig::default();
        config.api.base_url = "not a url".to_string();

        let err = wire_dependencies(&config, HostPorts::tracing()).err().unwrap();
        assert!(err.to_string().contains("Invalid api base_url"));
    }

    #[test]
    fn test_default_config_wires() {
        assert!(wire_dependencies(&ShellConfig::default(), HostPorts::tracing()).is_ok());
    }
}
