//! # Use Cases Accessor
//!
//! `AppRuntime` owns the wired ports and the configuration; `UseCases` hands
//! out use case instances with their dependencies pre-wired.
//!
//! ## Architecture
//!
//! - **ws-app**: use cases with `from_ports`/`new` constructors taking ports
//! - **bootstrap**: this module wires `Arc<dyn Port>` from `AppDeps` into them
//! - **Commands**: call `runtime.usecases().xxx()` to get use case instances
//!
//! ## Usage
//!
//! ```rust,no_run
//! # use widget_shell_lib::bootstrap::AppRuntime;
//! # async fn example(runtime: &AppRuntime) -> anyhow::Result<()> {
//! let engine = runtime.usecases().entity_engine("contacts")?;
//! engine.initialize().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use ws_app::entity::{EngineDeps, EngineSettings, EntityEngine};
use ws_app::widgets::{ExternalWidgetLoader, ResolverDeps, ResolverSettings, WidgetResolver};
use ws_app::{AppDeps, ListManager, ListMembershipSynchronizer, WidgetRegistry};
use ws_core::config::ShellConfig;
use ws_core::entity::{ConfigStore, EntityConfig};

/// Application runtime with dependencies.
///
/// 持有全部依赖，并通过 `usecases()` 提供用例访问。
///
/// The built-in widget registry is created once, so table widgets keep their
/// engines (and the engines their state) for the life of the runtime.
pub struct AppRuntime {
    deps: AppDeps,
    config: ShellConfig,
    configs: Arc<ConfigStore>,
    registry: Arc<WidgetRegistry>,
}

impl AppRuntime {
    /// Create a new AppRuntime from dependencies.
    /// 从依赖创建新的 AppRuntime。
    pub fn new(deps: AppDeps, config: ShellConfig, configs: ConfigStore) -> Self {
        let configs = Arc::new(configs);
        let registry = WidgetRegistry::builtin(&configs, |entity| {
            build_engine(&deps, &config, entity)
        });
        tracing::info!(widgets = ?registry.keys(), "built-in widgets registered");

        Self {
            deps,
            config,
            configs,
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn configs(&self) -> &Arc<ConfigStore> {
        &self.configs
    }

    pub fn registry(&self) -> &Arc<WidgetRegistry> {
        &self.registry
    }

    /// Get use cases accessor.
    /// 获取用例访问器。
    pub fn usecases(&self) -> UseCases<'_> {
        UseCases::new(self)
    }

    /// Stop every table engine's timers.
    pub fn shutdown(&self) {
        for table in self.registry.tables() {
            table.engine().shutdown();
        }
    }
}

fn build_engine(deps: &AppDeps, config: &ShellConfig, entity: Arc<EntityConfig>) -> EntityEngine {
    let settings = EngineSettings::resolve(&entity, config);
    EntityEngine::new(
        entity,
        settings,
        EngineDeps {
            entity_api: deps.entity_api.clone(),
            list_api: deps.list_api.clone(),
            scheduler: deps.scheduler.clone(),
            clock: deps.clock.clone(),
        },
    )
}

/// Error returned when a use case is requested for an entity type that has no
/// config.
#[derive(Debug, thiserror::Error)]
#[error("unknown entity type `{0}`")]
pub struct UnknownEntityType(pub String);

/// Use cases accessor for AppRuntime.
///
/// AppRuntime 的用例访问器。
pub struct UseCases<'a> {
    runtime: &'a AppRuntime,
}

impl<'a> UseCases<'a> {
    /// Create a new UseCases accessor from AppRuntime.
    /// 从 AppRuntime 创建新的 UseCases 访问器。
    pub fn new(runtime: &'a AppRuntime) -> Self {
        Self { runtime }
    }

    /// The engine behind the built-in `<type>-widget` table.
    ///
    /// Returns the registry's engine, not a fresh one, so state set through
    /// this handle shows up in the table widget.
    pub fn entity_engine(&self, entity_type: &str) -> Result<EntityEngine, UnknownEntityType> {
        self.runtime
            .registry
            .table(entity_type)
            .map(|table| table.engine().clone())
            .ok_or_else(|| UnknownEntityType(entity_type.to_string()))
    }

    /// A new engine for `entity_type` with its own state.
    pub fn detached_entity_engine(
        &self,
        entity_type: &str,
    ) -> Result<EntityEngine, UnknownEntityType> {
        let entity = self
            .runtime
            .configs
            .get(entity_type)
            .ok_or_else(|| UnknownEntityType(entity_type.to_string()))?;
        Ok(build_engine(&self.runtime.deps, &self.runtime.config, entity))
    }

    pub fn list_manager(&self, entity_type: &str) -> ListManager {
        ListManager::from_ports(entity_type, self.runtime.deps.list_api.clone())
    }

    pub fn list_synchronizer(&self) -> ListMembershipSynchronizer {
        ListMembershipSynchronizer::from_ports(self.runtime.deps.list_api.clone())
    }

    pub fn external_widget_loader(&self) -> ExternalWidgetLoader {
        let deps = &self.runtime.deps;
        ExternalWidgetLoader::from_ports(
            deps.external_registry.clone(),
            deps.script_host.clone(),
            deps.module_source.clone(),
            deps.object_urls.clone(),
            deps.module_importer.clone(),
        )
    }

    pub fn widget_resolver(&self) -> WidgetResolver {
        let deps = &self.runtime.deps;
        WidgetResolver::new(
            ResolverDeps {
                registry: self.runtime.registry.clone(),
                loader: Arc::new(self.external_widget_loader()),
                configs: self.runtime.configs.clone(),
                host: deps.host_signals.clone(),
                navigator: deps.navigator.clone(),
                scheduler: deps.scheduler.clone(),
            },
            ResolverSettings::from_config(&self.runtime.config.widgets),
        )
    }
}
