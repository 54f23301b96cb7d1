//! Test doubles for the ports the use cases drive.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use mockall::mock;
use serde_json::Value;
use ws_core::entity::{ActionSpec, CollectionQuery};
use ws_core::ids::{EntityId, ListId, MembershipId};
use ws_core::list::{EntityList, ListMember, NewList};
use ws_core::ports::{
    ApiError, ClockPort, EntityApiPort, HostSignalPort, ListApiPort, ModuleBlob,
    ModuleExports, ModuleImporterPort, ModuleSourcePort, ObjectUrlPort, ProfileNavigatorPort,
    ScheduledTask, ScriptEvent, ScriptHostPort, SchedulerPort, TaskHandle,
};
use ws_core::widget::{
    ExternalWidgetRegistry, ProfileKind, WidgetComponent, WidgetProps,
};

mock! {
    pub EntityApi {}

    #[async_trait]
    impl EntityApiPort for EntityApi {
        async fn fetch_collection(&self, endpoint: &str, query: &CollectionQuery) -> Result<Value, ApiError>;
        async fn fetch_filter_options(&self, endpoint: &str) -> Result<Value, ApiError>;
        async fn fetch_source(&self, source: &str) -> Result<Value, ApiError>;
        async fn create(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError>;
        async fn update(&self, endpoint: &str, id: &EntityId, body: &Value) -> Result<Value, ApiError>;
        async fn delete(&self, endpoint: &str, id: &EntityId) -> Result<Option<Value>, ApiError>;
        async fn undo_delete(&self, endpoint: &str, id: &EntityId, deleted_item: &Value) -> Result<(), ApiError>;
        async fn invoke_action(&self, endpoint: &str, id: &EntityId, action: &ActionSpec) -> Result<Value, ApiError>;
    }
}

mock! {
    pub ListApi {}

    #[async_trait]
    impl ListApiPort for ListApi {
        async fn lists(&self, entity_type: &str) -> Result<Vec<EntityList>, ApiError>;
        async fn create_list(&self, list: &NewList) -> Result<EntityList, ApiError>;
        async fn delete_list(&self, list_id: &ListId) -> Result<(), ApiError>;
        async fn members(&self, list_id: &ListId) -> Result<Vec<ListMember>, ApiError>;
        async fn add_members(&self, list_id: &ListId, entity_ids: &[EntityId]) -> Result<(), ApiError>;
        async fn remove_member(&self, list_id: &ListId, membership_id: &MembershipId) -> Result<(), ApiError>;
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

struct ManualHandle {
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    cancel_count: Arc<AtomicUsize>,
}

impl TaskHandle for ManualHandle {
    fn cancel(&self) {
        if !self.finished.load(Ordering::SeqCst) && !self.cancelled.swap(true, Ordering::SeqCst) {
            self.cancel_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

struct Pending {
    delay: Duration,
    task: Option<BoxFuture<'static, ()>>,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

/// Scheduler whose tasks run only when the test says so.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<Pending>>,
    cancel_count: Arc<AtomicUsize>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays of every task ever scheduled, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.pending.lock().unwrap().iter().map(|p| p.delay).collect()
    }

    pub fn cancelled(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }

    /// Runs every live task that has not run yet. Returns how many ran.
    pub async fn run_all(&self) -> usize {
        let due: Vec<(BoxFuture<'static, ()>, Arc<AtomicBool>)> = {
            let mut pending = self.pending.lock().unwrap();
            pending
                .iter_mut()
                .filter(|p| !p.cancelled.load(Ordering::SeqCst))
                .filter_map(|p| p.task.take().map(|t| (t, p.finished.clone())))
                .collect()
        };
        let count = due.len();
        for (task, finished) in due {
            task.await;
            finished.store(true, Ordering::SeqCst);
        }
        count
    }
}

impl SchedulerPort for ManualScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> ScheduledTask {
        let cancelled = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        self.pending.lock().unwrap().push(Pending {
            delay,
            task: Some(task),
            cancelled: cancelled.clone(),
            finished: finished.clone(),
        });
        ScheduledTask::new(Box::new(ManualHandle {
            cancelled,
            finished,
            cancel_count: self.cancel_count.clone(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Ready(String),
    Error(String, String),
    Open(ProfileKind, EntityId),
}

/// Host that records every signal it receives.
#[derive(Default)]
pub struct RecordingHost {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().unwrap().clone()
    }
}

impl HostSignalPort for RecordingHost {
    fn ready(&self, widget_key: &str) {
        self.signals
            .lock()
            .unwrap()
            .push(Signal::Ready(widget_key.to_string()));
    }

    fn error(&self, widget_key: &str, message: &str) {
        self.signals
            .lock()
            .unwrap()
            .push(Signal::Error(widget_key.to_string(), message.to_string()));
    }
}

impl ProfileNavigatorPort for RecordingHost {
    fn open_profile(&self, kind: ProfileKind, id: &EntityId) {
        self.signals
            .lock()
            .unwrap()
            .push(Signal::Open(kind, id.clone()));
    }
}

/// Component that renders its name and props.
pub struct StubComponent(pub &'static str);

impl WidgetComponent for StubComponent {
    fn name(&self) -> &str {
        self.0
    }

    fn render(&self, props: &WidgetProps) -> Value {
        serde_json::json!({ "stub": self.0, "props": props.values, "callbacks": props.callback_names() })
    }
}

/// Script host that registers `registers` (if any) into the shared registry.
pub struct ScriptedHost {
    pub registry: ExternalWidgetRegistry,
    pub registers: Option<&'static str>,
    pub failure: Option<&'static str>,
}

#[async_trait]
impl ScriptHostPort for ScriptedHost {
    async fn append_script(&self, _uri: &str) -> ScriptEvent {
        if let Some(reason) = self.failure {
            return ScriptEvent::Failed(reason.to_string());
        }
        if let Some(key) = self.registers {
            self.registry.register(key, Arc::new(StubComponent(key)));
        }
        ScriptEvent::Loaded
    }
}

/// Module source answering every fetch with the same result.
pub struct StaticModuleSource(pub Result<String, ApiError>);

#[async_trait]
impl ModuleSourcePort for StaticModuleSource {
    async fn fetch_module(&self, _uri: &str) -> Result<String, ApiError> {
        self.0.clone()
    }
}

/// Object URL port counting creations and revocations.
#[derive(Default)]
pub struct CountingObjectUrls {
    created: Mutex<Vec<String>>,
    revoked: Mutex<Vec<String>>,
}

impl CountingObjectUrls {
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

impl ObjectUrlPort for CountingObjectUrls {
    fn create_object_url(&self, _blob: ModuleBlob) -> String {
        let mut created = self.created.lock().unwrap();
        let url = format!("blob:test/{}", created.len());
        created.push(url.clone());
        url
    }

    fn revoke_object_url(&self, url: &str) {
        self.revoked.lock().unwrap().push(url.to_string());
    }
}

/// Importer returning a default export, none, or an error.
pub enum StubImporter {
    Default(&'static str),
    NoDefault,
    Fails(&'static str),
}

#[async_trait]
impl ModuleImporterPort for StubImporter {
    async fn import(&self, _url: &str) -> Result<ModuleExports, String> {
        match self {
            StubImporter::Default(name) => Ok(ModuleExports {
                default: Some(Arc::new(StubComponent(name)) as Arc<dyn WidgetComponent>),
            }),
            StubImporter::NoDefault => Ok(ModuleExports { default: None }),
            StubImporter::Fails(reason) => Err(reason.to_string()),
        }
    }
}
