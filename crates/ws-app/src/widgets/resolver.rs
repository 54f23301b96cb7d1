//! Widget key resolution and per-mount lifecycle signalling.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, warn};
use ws_core::config::WidgetsConfig;
use ws_core::entity::ConfigStore;
use ws_core::ids::EntityId;
use ws_core::ports::{HostSignalPort, ProfileNavigatorPort, ScheduledTask, SchedulerPort};
use ws_core::widget::{
    is_search_result, profile_stem, split_key, MountSignals, ProfileCallback, Provenance,
    RenderOutcome, SpinnerSize, UnknownWidget, WidgetComponent, WidgetDescriptor, WidgetProps,
    PROFILE_HANDLERS,
};

use super::components::SearchResultWidget;
use super::loader::ExternalWidgetLoader;
use super::registry::WidgetRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    pub spinner_size: SpinnerSize,
    /// Delay between first paint and the "ready" signal.
    pub ready_delay: Duration,
}

impl ResolverSettings {
    pub fn from_config(config: &WidgetsConfig) -> Self {
        Self {
            spinner_size: config.spinner_size,
            ready_delay: config.ready_delay(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from_config(&WidgetsConfig::default())
    }
}

/// What the host knows about the mount site.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// Props passed through to the widget.
    pub props: Map<String, Value>,
    /// Payload of a `search-result-*` widget.
    pub search_result: Option<Value>,
}

pub struct ResolverDeps {
    pub registry: Arc<WidgetRegistry>,
    pub loader: Arc<ExternalWidgetLoader>,
    pub configs: Arc<ConfigStore>,
    pub host: Arc<dyn HostSignalPort>,
    pub navigator: Arc<dyn ProfileNavigatorPort>,
    pub scheduler: Arc<dyn SchedulerPort>,
}

enum Resolution {
    Registered(Arc<dyn WidgetComponent>, WidgetProps),
    External(External),
    Unknown(UnknownWidget),
}

enum External {
    Script { path: String },
    Module { path: String },
}

/// Resolves widget descriptors into mounts.
pub struct WidgetResolver {
    deps: ResolverDeps,
    settings: ResolverSettings,
}

impl WidgetResolver {
    pub fn new(deps: ResolverDeps, settings: ResolverSettings) -> Self {
        Self { deps, settings }
    }

    pub fn registry(&self) -> &Arc<WidgetRegistry> {
        &self.deps.registry
    }

    pub fn settings(&self) -> ResolverSettings {
        self.settings
    }

    /// Resolves `descriptor` and starts its mount.
    ///
    /// The returned mount publishes its current [`RenderOutcome`]; external
    /// widgets start as `Loading` and settle once the loader answers.
    #[tracing::instrument(
        name = "usecase.resolve_widget.mount",
        skip(self, descriptor, context),
        fields(key = %descriptor.key, provenance = descriptor.provenance.label())
    )]
    pub fn mount(&self, descriptor: &WidgetDescriptor, context: ResolveContext) -> WidgetMount {
        let resolution = self.resolve(descriptor, context.props.clone(), context.search_result);
        let initial = match &resolution {
            Resolution::Registered(component, props) => RenderOutcome::Registered {
                component: component.clone(),
                props: props.clone(),
            },
            Resolution::External(_) => RenderOutcome::Loading(self.settings.spinner_size),
            Resolution::Unknown(unknown) => RenderOutcome::Unknown(unknown.clone()),
        };
        let (tx, rx) = watch::channel(initial);
        let inner = Arc::new(MountInner {
            key: descriptor.key.clone(),
            host: self.deps.host.clone(),
            scheduler: self.deps.scheduler.clone(),
            ready_delay: self.settings.ready_delay,
            tx,
            signals: Mutex::new(MountSignals::new()),
            ready_timer: Mutex::new(None),
            load_task: Mutex::new(None),
        });

        match resolution {
            Resolution::Registered(..) => inner.schedule_ready(),
            Resolution::Unknown(unknown) => {
                warn!(
                    base_key = %unknown.base_key,
                    known = ?unknown.known_keys,
                    "unknown widget key"
                );
            }
            Resolution::External(external) => {
                inner.lock_signals().begin_loading();
                let props = self.props_with_callbacks(context.props);
                self.start_load(&inner, external, props);
            }
        }

        WidgetMount { inner, rx }
    }

    fn resolve(
        &self,
        descriptor: &WidgetDescriptor,
        props: Map<String, Value>,
        search_result: Option<Value>,
    ) -> Resolution {
        let key = descriptor.key.as_str();

        if is_search_result(key) {
            return Resolution::Registered(
                Arc::new(SearchResultWidget),
                SearchResultWidget::props(search_result),
            );
        }

        if !matches!(descriptor.provenance, Provenance::BuiltinReact { .. }) {
            if let Some(component) = self.deps.registry.get(key) {
                return Resolution::Registered(component, self.props_with_callbacks(props));
            }
        }

        match &descriptor.provenance {
            Provenance::Builtin => Resolution::Unknown(self.unknown(key)),
            Provenance::Uploaded { path } => {
                Resolution::External(External::Script { path: path.clone() })
            }
            Provenance::Fetched { path } => {
                Resolution::External(External::Module { path: path.clone() })
            }
            Provenance::BuiltinReact { widget_data } => {
                let (base, suffix) = split_key(key);
                let Some(component) = self.deps.registry.get(base) else {
                    return Resolution::Unknown(self.unknown(key));
                };
                let props = match profile_stem(base) {
                    Some(stem) => {
                        let id = self.profile_id(stem, widget_data, suffix);
                        let mut values = Map::new();
                        values.insert(
                            "id".to_string(),
                            id.map(|id| Value::String(id.into())).unwrap_or(Value::Null),
                        );
                        WidgetProps::from_values(values)
                    }
                    None => {
                        let mut values = props;
                        values.insert(
                            "widgetData".to_string(),
                            Value::Object(widget_data.clone()),
                        );
                        WidgetProps::from_values(values)
                    }
                };
                Resolution::Registered(component, props)
            }
        }
    }

    /// Reads the record id of a profile widget from its auxiliary data,
    /// using the entity's declared id field, else the key suffix.
    fn profile_id(
        &self,
        stem: &str,
        widget_data: &Map<String, Value>,
        suffix: Option<&str>,
    ) -> Option<EntityId> {
        let from_data = self
            .deps
            .configs
            .by_profile_stem(stem)
            .and_then(|config| config.profile.as_ref().map(|p| p.id_field.clone()))
            .and_then(|id_field| widget_data.get(&id_field).and_then(EntityId::from_json));
        let id = from_data.or_else(|| suffix.map(EntityId::from));
        if id.is_none() {
            debug!(stem, "profile widget has no record id");
        }
        id
    }

    fn props_with_callbacks(&self, values: Map<String, Value>) -> WidgetProps {
        let mut props = WidgetProps::from_values(values);
        props.callbacks = PROFILE_HANDLERS
            .iter()
            .map(|(kind, handler)| {
                (
                    *handler,
                    ProfileCallback::new(*kind, self.deps.navigator.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();
        props
    }

    fn unknown(&self, key: &str) -> UnknownWidget {
        UnknownWidget {
            requested_key: key.to_string(),
            base_key: split_key(key).0.to_string(),
            known_keys: self.deps.registry.keys(),
        }
    }

    fn start_load(&self, inner: &Arc<MountInner>, external: External, props: WidgetProps) {
        let weak = Arc::downgrade(inner);
        let loader = self.deps.loader.clone();
        let key = inner.key.clone();
        let task = self.deps.scheduler.schedule(
            Duration::ZERO,
            Box::pin(async move {
                let result = match &external {
                    External::Script { path } => loader.load_script(&key, path).await,
                    External::Module { path } => loader.load_module(path).await,
                };
                if let Some(inner) = weak.upgrade() {
                    inner.finish_load(result.map_err(|e| e.to_string()), props);
                }
            }),
        );
        *inner.load_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }
}

struct MountInner {
    key: String,
    host: Arc<dyn HostSignalPort>,
    scheduler: Arc<dyn SchedulerPort>,
    ready_delay: Duration,
    tx: watch::Sender<RenderOutcome>,
    signals: Mutex<MountSignals>,
    ready_timer: Mutex<Option<ScheduledTask>>,
    load_task: Mutex<Option<ScheduledTask>>,
}

impl MountInner {
    fn lock_signals(&self) -> std::sync::MutexGuard<'_, MountSignals> {
        self.signals.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// "ready" follows the first paint after the configured delay.
    fn schedule_ready(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let task = self.scheduler.schedule(
            self.ready_delay,
            Box::pin(async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let fire = inner.lock_signals().try_ready();
                if fire {
                    debug!(key = %inner.key, "widget ready");
                    inner.host.ready(&inner.key);
                }
            }),
        );
        *self.ready_timer.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }

    fn finish_load(self: &Arc<Self>, result: Result<Arc<dyn WidgetComponent>, String>, props: WidgetProps) {
        self.lock_signals().finish_loading();
        match result {
            Ok(component) => {
                self.tx.send_replace(RenderOutcome::Registered { component, props });
                self.schedule_ready();
            }
            Err(message) => {
                warn!(key = %self.key, %message, "external widget failed to load");
                self.tx.send_replace(RenderOutcome::Error(message.clone()));
                let fire = self.lock_signals().try_error();
                if fire {
                    self.host.error(&self.key, &message);
                }
            }
        }
    }

    fn cancel_timers(&self) {
        for slot in [&self.ready_timer, &self.load_task] {
            let task = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
            if let Some(task) = task {
                task.cancel();
            }
        }
    }
}

/// One mounted widget.
///
/// Dropping the mount cancels its pending load and ready timer.
pub struct WidgetMount {
    inner: Arc<MountInner>,
    rx: watch::Receiver<RenderOutcome>,
}

impl WidgetMount {
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn outcome(&self) -> RenderOutcome {
        self.rx.borrow().clone()
    }

    /// View model of the current outcome.
    pub fn render(&self) -> Value {
        self.rx.borrow().render()
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderOutcome> {
        self.rx.clone()
    }

    /// Waits until the mount leaves `Loading`.
    pub async fn settled(&mut self) -> RenderOutcome {
        let settled = match self.rx.wait_for(|outcome| !outcome.is_loading()).await {
            Ok(outcome) => Some(outcome.clone()),
            // The sender lives in `inner`, which this mount owns.
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.rx.borrow().clone())
    }

    pub fn unmount(self) {
        self.inner.cancel_timers();
        debug!(key = %self.inner.key, "widget unmounted");
    }
}

impl std::fmt::Debug for WidgetMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetMount")
            .field("key", &self.inner.key)
            .field("outcome", &*self.rx.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        CountingObjectUrls, ManualScheduler, RecordingHost, ScriptedHost, Signal,
        StaticModuleSource, StubComponent, StubImporter,
    };
    use serde_json::json;
    use ws_core::widget::{ExternalWidgetRegistry, ProfileKind};

    struct Harness {
        resolver: WidgetResolver,
        host: Arc<RecordingHost>,
        scheduler: Arc<ManualScheduler>,
        urls: Arc<CountingObjectUrls>,
    }

    fn harness(importer: StubImporter) -> Harness {
        let mut registry = WidgetRegistry::new();
        registry.register("contacts-widget", Arc::new(StubComponent("contacts-widget")));
        registry.register("lead-profile-widget", Arc::new(StubComponent("lead-profile-widget")));
        registry.register("sales-profile-widget", Arc::new(StubComponent("sales-profile-widget")));
        registry.register("dashboard-widget", Arc::new(StubComponent("dashboard-widget")));

        let external = ExternalWidgetRegistry::new();
        let host = Arc::new(RecordingHost::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let urls = Arc::new(CountingObjectUrls::default());
        let loader = ExternalWidgetLoader::from_ports(
            external.clone(),
            Arc::new(ScriptedHost {
                registry: external,
                registers: Some("weather"),
                failure: None,
            }),
            Arc::new(StaticModuleSource(Ok("{}".to_string()))),
            urls.clone(),
            Arc::new(importer),
        );
        let resolver = WidgetResolver::new(
            ResolverDeps {
                registry: Arc::new(registry),
                loader: Arc::new(loader),
                configs: Arc::new(ConfigStore::builtin()),
                host: host.clone(),
                navigator: host.clone(),
                scheduler: scheduler.clone(),
            },
            ResolverSettings {
                spinner_size: SpinnerSize::Small,
                ready_delay: Duration::from_millis(100),
            },
        );
        Harness {
            resolver,
            host,
            scheduler,
            urls,
        }
    }

    fn props(outcome: &RenderOutcome) -> WidgetProps {
        match outcome {
            RenderOutcome::Registered { props, .. } => props.clone(),
            other => panic!("expected a registered widget, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn builtin_gets_profile_callbacks_and_signals_ready_once() {
        let h = harness(StubImporter::NoDefault);
        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin("contacts-widget"),
            ResolveContext::default(),
        );

        let props = props(&mount.outcome());
        assert_eq!(props.callbacks.len(), PROFILE_HANDLERS.len());
        props
            .callback("onOpenSaleProfile")
            .unwrap()
            .invoke(&EntityId::from("3"));

        assert!(h.host.signals().iter().all(|s| !matches!(s, Signal::Ready(_))));
        assert_eq!(h.scheduler.delays(), vec![Duration::from_millis(100)]);
        h.scheduler.run_all().await;
        assert_eq!(h.scheduler.run_all().await, 0);

        assert_eq!(
            h.host.signals(),
            vec![
                Signal::Open(ProfileKind::Sale, EntityId::from("3")),
                Signal::Ready("contacts-widget".to_string()),
            ]
        );
    }

    #[test]
    fn parameterized_profile_key_reads_id_from_declared_field() {
        let h = harness(StubImporter::NoDefault);
        let mut data = Map::new();
        data.insert("leadId".to_string(), json!(35));
        data.insert("extra".to_string(), json!("ignored"));

        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin_react("lead-profile-widget-35", data),
            ResolveContext::default(),
        );

        let props = props(&mount.outcome());
        assert_eq!(props.values.len(), 1);
        assert_eq!(props.values["id"], json!("35"));
    }

    #[test]
    fn sales_profile_uses_sale_id() {
        let h = harness(StubImporter::NoDefault);
        let mut data = Map::new();
        data.insert("saleId".to_string(), json!(8));
        data.insert("salesId".to_string(), json!(9));

        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin_react("sales-profile-widget-1", data),
            ResolveContext::default(),
        );

        assert_eq!(props(&mount.outcome()).values["id"], json!("8"));
    }

    #[test]
    fn profile_id_falls_back_to_key_suffix() {
        let h = harness(StubImporter::NoDefault);
        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin_react("lead-profile-widget-35", Map::new()),
            ResolveContext::default(),
        );

        assert_eq!(props(&mount.outcome()).values["id"], json!("35"));
    }

    #[test]
    fn non_profile_react_widget_gets_props_and_widget_data() {
        let h = harness(StubImporter::NoDefault);
        let mut data = Map::new();
        data.insert("range".to_string(), json!("7d"));
        let mut context = ResolveContext::default();
        context.props.insert("theme".to_string(), json!("dark"));

        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin_react("dashboard-widget-2", data),
            context,
        );

        let props = props(&mount.outcome());
        assert_eq!(props.values["theme"], json!("dark"));
        assert_eq!(props.values["widgetData"], json!({"range": "7d"}));
    }

    #[test]
    fn unknown_key_reports_sorted_known_keys() {
        let h = harness(StubImporter::NoDefault);
        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin_react("nope-widget-4", Map::new()),
            ResolveContext::default(),
        );

        match mount.outcome() {
            RenderOutcome::Unknown(unknown) => {
                assert_eq!(unknown.requested_key, "nope-widget-4");
                assert_eq!(unknown.base_key, "nope-widget");
                let mut sorted = unknown.known_keys.clone();
                sorted.sort();
                assert_eq!(unknown.known_keys, sorted);
                assert_eq!(unknown.known_keys.len(), 4);
            }
            other => panic!("expected unknown, got {other:?}"),
        }
        assert!(h.scheduler.delays().is_empty());
    }

    #[tokio::test]
    async fn search_result_prefix_wins_over_provenance() {
        let h = harness(StubImporter::NoDefault);
        let mount = h.resolver.mount(
            &WidgetDescriptor::uploaded("search-result-17", "/w/x.js"),
            ResolveContext {
                props: Map::new(),
                search_result: Some(json!({"title": "Acme"})),
            },
        );

        assert_eq!(mount.render()["title"], json!("Acme"));
        h.scheduler.run_all().await;
        assert_eq!(
            h.host.signals(),
            vec![Signal::Ready("search-result-17".to_string())]
        );
    }

    #[tokio::test]
    async fn uploaded_widget_loads_then_signals_ready() {
        let h = harness(StubImporter::NoDefault);
        let mut mount = h.resolver.mount(
            &WidgetDescriptor::uploaded("weather", "/w/weather.js"),
            ResolveContext::default(),
        );
        assert!(matches!(mount.outcome(), RenderOutcome::Loading(SpinnerSize::Small)));

        // First run performs the load, second fires the ready timer it scheduled.
        assert_eq!(h.scheduler.run_all().await, 1);
        assert!(mount.settled().await.is_registered());
        assert!(h.host.signals().is_empty());
        assert_eq!(h.scheduler.run_all().await, 1);
        assert_eq!(h.host.signals(), vec![Signal::Ready("weather".to_string())]);
    }

    #[tokio::test]
    async fn uploaded_key_already_registered_skips_the_loader() {
        let h = harness(StubImporter::NoDefault);
        let mount = h.resolver.mount(
            &WidgetDescriptor::uploaded("contacts-widget", "/w/contacts.js"),
            ResolveContext::default(),
        );

        let props = props(&mount.outcome());
        assert_eq!(props.callbacks.len(), PROFILE_HANDLERS.len());
        assert!(h.urls.created().is_empty());
        assert_eq!(h.scheduler.delays(), vec![Duration::from_millis(100)]);
        h.scheduler.run_all().await;
        assert_eq!(
            h.host.signals(),
            vec![Signal::Ready("contacts-widget".to_string())]
        );
    }

    #[test]
    fn fetched_key_already_registered_resolves_from_registry() {
        let h = harness(StubImporter::Fails("unused"));
        let mount = h.resolver.mount(
            &WidgetDescriptor::fetched("dashboard-widget", "/w/dash.js"),
            ResolveContext::default(),
        );

        assert!(mount.outcome().is_registered());
    }

    #[tokio::test]
    async fn failed_module_import_shows_error_and_revokes_once() {
        let h = harness(StubImporter::Fails("boom"));
        let mut mount = h.resolver.mount(
            &WidgetDescriptor::fetched("chart", "/w/chart.js"),
            ResolveContext::default(),
        );

        h.scheduler.run_all().await;
        let outcome = mount.settled().await;

        assert!(matches!(outcome, RenderOutcome::Error(ref m) if m.contains("boom")));
        assert_eq!(h.urls.revoked().len(), 1);
        assert_eq!(h.urls.revoked(), h.urls.created());
        assert_eq!(h.scheduler.run_all().await, 0);
        assert!(matches!(
            h.host.signals().as_slice(),
            [Signal::Error(key, _)] if key == "chart"
        ));
    }

    #[tokio::test]
    async fn unmount_cancels_pending_ready() {
        let h = harness(StubImporter::NoDefault);
        let mount = h.resolver.mount(
            &WidgetDescriptor::builtin("contacts-widget"),
            ResolveContext::default(),
        );

        mount.unmount();

        assert_eq!(h.scheduler.cancelled(), 1);
        assert_eq!(h.scheduler.run_all().await, 0);
        assert!(h.host.signals().is_empty());
    }
}
