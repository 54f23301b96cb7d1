//! Generic, config-driven CRUD engine.
//!
//! One engine instance serves one entity type. Everything it knows about
//! the type comes from the [`EntityConfig`]; there is no per-entity code.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ws_core::config::ShellConfig;
use ws_core::entity::{
    extract_collection, format_cell, CollectionQuery, EngineError, EntityConfig, EntityRecord,
    Feature, FieldSpec, FieldType, FilterState, FormMode, FormState, PaginationState, SEARCH_KEY,
};
use ws_core::ids::{EntityId, ListId};
use ws_core::list::SyncReport;
use ws_core::ports::{
    ApiError, ClockPort, EntityApiPort, ListApiPort, ScheduledTask, SchedulerPort,
};

use super::dropdowns::DropdownCache;
use super::transform::SubmitTransform;
use super::view::{
    EntityView, ErrorView, FormFieldView, FormView, RowView, SearchAffordance, UndoView,
};
use crate::lists::ListMembershipSynchronizer;
use crate::undo::UndoDeleteManager;

/// Tunables resolved from the entity config and the shell config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub items_per_page: u32,
    pub search_debounce: Duration,
    pub undo_window: Duration,
}

impl EngineSettings {
    /// A shell-wide page size overrides the entity's; an entity undo window
    /// overrides the shell's window for its policy.
    pub fn resolve(config: &EntityConfig, shell: &ShellConfig) -> Self {
        Self {
            items_per_page: shell
                .engine
                .items_per_page
                .unwrap_or(config.items_per_page)
                .max(1),
            search_debounce: shell.engine.search_debounce(),
            undo_window: config
                .undo_window()
                .unwrap_or_else(|| shell.undo.window(config.undo_policy)),
        }
    }
}

/// Ports an engine drives.
pub struct EngineDeps {
    pub entity_api: Arc<dyn EntityApiPort>,
    pub list_api: Arc<dyn ListApiPort>,
    pub scheduler: Arc<dyn SchedulerPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Whether a load's response was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Stale,
}

struct EngineState {
    records: Vec<EntityRecord>,
    pagination: PaginationState,
    filters: FilterState,
    list_id: Option<ListId>,
    selection: BTreeSet<EntityId>,
    form: Option<FormState>,
    search: SearchAffordance,
    loading: bool,
    last_error: Option<EngineError>,
}

struct Shared {
    config: Arc<EntityConfig>,
    settings: EngineSettings,
    api: Arc<dyn EntityApiPort>,
    scheduler: Arc<dyn SchedulerPort>,
    lists: ListMembershipSynchronizer,
    undo: UndoDeleteManager,
    dropdowns: DropdownCache,
    transform: Option<Arc<dyn SubmitTransform>>,
    state: Mutex<EngineState>,
    load_seq: AtomicU64,
    debounce: std::sync::Mutex<Option<ScheduledTask>>,
}

/// Config-driven CRUD surface for one entity type.
///
/// 由配置驱动的通用实体引擎。
///
/// Cloning is cheap and clones share state. The state lock is never held
/// across a network call; every collection read carries a sequence number
/// and only the latest one's response is applied.
#[derive(Clone)]
pub struct EntityEngine {
    shared: Arc<Shared>,
}

impl EntityEngine {
    pub fn new(config: Arc<EntityConfig>, settings: EngineSettings, deps: EngineDeps) -> Self {
        Self::build(config, settings, deps, None)
    }

    pub fn with_submit_transform(
        config: Arc<EntityConfig>,
        settings: EngineSettings,
        deps: EngineDeps,
        transform: Arc<dyn SubmitTransform>,
    ) -> Self {
        Self::build(config, settings, deps, Some(transform))
    }

    fn build(
        config: Arc<EntityConfig>,
        settings: EngineSettings,
        deps: EngineDeps,
        transform: Option<Arc<dyn SubmitTransform>>,
    ) -> Self {
        let undo = UndoDeleteManager::from_ports(
            deps.entity_api.clone(),
            deps.scheduler.clone(),
            deps.clock,
            config.api_endpoint.clone(),
            settings.undo_window,
        );
        let state = EngineState {
            records: Vec::new(),
            pagination: PaginationState::first(settings.items_per_page),
            filters: FilterState::from_defaults(&config.default_filters),
            list_id: None,
            selection: BTreeSet::new(),
            form: None,
            search: SearchAffordance::NeverSearched,
            loading: false,
            last_error: None,
        };
        Self {
            shared: Arc::new(Shared {
                dropdowns: DropdownCache::new(deps.entity_api.clone()),
                lists: ListMembershipSynchronizer::from_ports(deps.list_api),
                api: deps.entity_api,
                scheduler: deps.scheduler,
                undo,
                transform,
                state: Mutex::new(state),
                load_seq: AtomicU64::new(0),
                debounce: std::sync::Mutex::new(None),
                config,
                settings,
            }),
        }
    }

    pub fn config(&self) -> &Arc<EntityConfig> {
        &self.shared.config
    }

    pub fn settings(&self) -> EngineSettings {
        self.shared.settings
    }

    pub fn undo_manager(&self) -> &UndoDeleteManager {
        &self.shared.undo
    }

    fn require(&self, feature: Feature) -> Result<(), EngineError> {
        if self.shared.config.has(feature) {
            Ok(())
        } else {
            Err(EngineError::FeatureDisabled(feature))
        }
    }

    /// Prefetches dropdown data and filter options while loading page 1.
    #[tracing::instrument(
        name = "usecase.entity_engine.initialize",
        skip(self),
        fields(entity = %self.shared.config.entity_type)
    )]
    pub async fn initialize(&self) -> Result<LoadOutcome, EngineError> {
        let shared = &self.shared;
        let prefetch = async {
            shared.dropdowns.prefetch(&shared.config.sources()).await;
            if shared.config.has(Feature::FilterOptions) {
                shared
                    .dropdowns
                    .prefetch_filter_options(&shared.config.api_endpoint)
                    .await;
            }
        };
        let ((), loaded) = tokio::join!(prefetch, self.load(1));
        loaded
    }

    /// Reads one page with the current filters, search and list.
    ///
    /// On failure the previous records stay and the error is recorded as
    /// retryable. A response that is no longer the latest is discarded.
    #[tracing::instrument(
        name = "usecase.entity_engine.load",
        skip(self),
        fields(entity = %self.shared.config.entity_type)
    )]
    pub async fn load(&self, page: u32) -> Result<LoadOutcome, EngineError> {
        let shared = &self.shared;
        let items_per_page = shared.settings.items_per_page;
        let seq = shared.load_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let query = {
            let mut state = shared.state.lock().await;
            state.loading = true;
            CollectionQuery::build(page, items_per_page, &state.filters, state.list_id.as_ref())
        };

        let result = shared
            .api
            .fetch_collection(&shared.config.api_endpoint, &query)
            .await;

        let mut state = shared.state.lock().await;
        if seq != shared.load_seq.load(Ordering::SeqCst) {
            debug!(seq, "stale response discarded");
            return Ok(LoadOutcome::Stale);
        }
        state.loading = false;

        let collection = result.and_then(|body| {
            extract_collection(&shared.config.data_key, &body, query.page, items_per_page)
                .map_err(|err| ApiError::Decode(err.to_string()))
        });

        match collection {
            Ok(collection) => {
                debug!(
                    records = collection.records.len(),
                    shape = ?collection.shape,
                    "page loaded"
                );
                state.records = collection.records;
                state.pagination = collection.pagination;
                state.last_error = None;
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, "collection load failed");
                let err = EngineError::Load(err);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Reloads the current page.
    pub async fn reload(&self) -> Result<LoadOutcome, EngineError> {
        let page = self.shared.state.lock().await.pagination.current_page;
        self.load(page).await
    }

    /// Loads `page` if it exists. Out-of-range pages never reach the server.
    pub async fn go_to_page(&self, page: u32) -> Result<LoadOutcome, EngineError> {
        let pagination = self.shared.state.lock().await.pagination;
        if !pagination.contains(page) {
            return Err(EngineError::PageOutOfRange {
                page,
                total_pages: pagination.total_pages,
            });
        }
        self.load(page).await
    }

    pub async fn next_page(&self) -> Result<LoadOutcome, EngineError> {
        let pagination = self.shared.state.lock().await.pagination;
        self.go_to_page(pagination.current_page.saturating_add(1))
            .await
    }

    pub async fn previous_page(&self) -> Result<LoadOutcome, EngineError> {
        let pagination = self.shared.state.lock().await.pagination;
        self.go_to_page(pagination.current_page.saturating_sub(1))
            .await
    }

    pub async fn pagination(&self) -> PaginationState {
        self.shared.state.lock().await.pagination
    }

    pub async fn records(&self) -> Vec<EntityRecord> {
        self.shared.state.lock().await.records.clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.shared.state.lock().await.filters.clone()
    }

    pub async fn last_error(&self) -> Option<EngineError> {
        self.shared.state.lock().await.last_error.clone()
    }

    // ---- filters -------------------------------------------------------

    /// Sets one filter and reloads from page 1. An empty value clears it.
    pub async fn set_filter(&self, key: &str, value: &str) -> Result<LoadOutcome, EngineError> {
        if key == SEARCH_KEY {
            return self.apply_search(value).await;
        }
        self.require(Feature::Filtering)?;
        self.shared.state.lock().await.filters.set(key, value);
        self.load(1).await
    }

    pub async fn clear_filter(&self, key: &str) -> Result<LoadOutcome, EngineError> {
        if key == SEARCH_KEY {
            return self.clear_search().await;
        }
        self.require(Feature::Filtering)?;
        self.shared.state.lock().await.filters.remove(key);
        self.load(1).await
    }

    /// Restores the default filters. The search term is kept.
    pub async fn clear_filters(&self) -> Result<LoadOutcome, EngineError> {
        self.require(Feature::Filtering)?;
        {
            let mut state = self.shared.state.lock().await;
            let search = state.filters.search().map(str::to_string);
            state.filters = FilterState::from_defaults(&self.shared.config.default_filters);
            if let Some(term) = search {
                state.filters.set_search(&term);
            }
        }
        self.load(1).await
    }

    pub async fn active_filter_count(&self) -> usize {
        self.shared.state.lock().await.filters.active_count()
    }

    /// Restricts the collection to one saved list, or lifts the restriction.
    pub async fn set_list(&self, list_id: Option<ListId>) -> Result<LoadOutcome, EngineError> {
        self.require(Feature::ListManagement)?;
        self.shared.state.lock().await.list_id = list_id;
        self.load(1).await
    }

    // ---- search --------------------------------------------------------

    /// Debounced search input. Each keystroke reschedules the pending
    /// search; in-flight reads are not cancelled.
    pub fn search_input(&self, term: &str) {
        let weak = Arc::downgrade(&self.shared);
        let term = term.to_string();
        let task = self.shared.scheduler.schedule(
            self.shared.settings.search_debounce,
            Box::pin(async move {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let engine = EntityEngine { shared };
                if let Err(err) = engine.apply_search(&term).await {
                    debug!(error = %err, "debounced search failed");
                }
            }),
        );
        let mut pending = self.shared.debounce.lock().unwrap_or_else(|e| e.into_inner());
        // Replacing the handle cancels the previous timer.
        *pending = Some(task);
    }

    fn cancel_pending_search(&self) {
        let pending = self
            .shared
            .debounce
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = pending {
            task.cancel();
        }
    }

    /// Applies `term` under the reserved search key and reloads page 1.
    /// A blank term removes the key.
    pub async fn apply_search(&self, term: &str) -> Result<LoadOutcome, EngineError> {
        {
            let mut state = self.shared.state.lock().await;
            state.filters.set_search(term);
            state.search = match (state.filters.search().is_some(), state.search) {
                (true, _) => SearchAffordance::Active,
                (false, SearchAffordance::NeverSearched) => SearchAffordance::NeverSearched,
                (false, _) => SearchAffordance::Cleared,
            };
        }
        self.load(1).await
    }

    pub async fn clear_search(&self) -> Result<LoadOutcome, EngineError> {
        self.cancel_pending_search();
        self.apply_search("").await
    }

    pub async fn search_affordance(&self) -> SearchAffordance {
        self.shared.state.lock().await.search
    }

    // ---- selection -----------------------------------------------------

    /// Toggles `id` in the selection. Returns whether it is now selected.
    pub async fn toggle_selection(&self, id: &EntityId) -> Result<bool, EngineError> {
        self.require(Feature::BulkSelection)?;
        let mut state = self.shared.state.lock().await;
        if state.selection.remove(id) {
            Ok(false)
        } else {
            state.selection.insert(id.clone());
            Ok(true)
        }
    }

    pub async fn select_all_visible(&self) -> Result<usize, EngineError> {
        self.require(Feature::BulkSelection)?;
        let id_field = &self.shared.config.id_field;
        let mut state = self.shared.state.lock().await;
        let visible: Vec<EntityId> = state.records.iter().filter_map(|r| r.id(id_field)).collect();
        state.selection.extend(visible);
        Ok(state.selection.len())
    }

    pub async fn clear_selection(&self) {
        self.shared.state.lock().await.selection.clear();
    }

    pub async fn selection(&self) -> BTreeSet<EntityId> {
        self.shared.state.lock().await.selection.clone()
    }

    async fn selection_for_bulk(&self) -> Result<BTreeSet<EntityId>, EngineError> {
        self.require(Feature::BulkSelection)?;
        self.require(Feature::ListManagement)?;
        let selection = self.selection().await;
        if selection.is_empty() {
            return Err(EngineError::EmptySelection);
        }
        Ok(selection)
    }

    // ---- bulk list operations ------------------------------------------

    /// Adds every selected record to `list_id` in one request.
    #[tracing::instrument(name = "usecase.entity_engine.add_to_list", skip(self), fields(list_id = %list_id))]
    pub async fn add_selection_to_list(&self, list_id: &ListId) -> Result<SyncReport, EngineError> {
        let selection = self.selection_for_bulk().await?;
        let ids: Vec<EntityId> = selection.into_iter().collect();
        let report = self.shared.lists.add(list_id, &ids).await?;
        self.after_bulk().await;
        Ok(report)
    }

    /// Removes every selected record from `list_id`, one request per
    /// membership, and waits for all of them before reloading.
    #[tracing::instrument(name = "usecase.entity_engine.remove_from_list", skip(self), fields(list_id = %list_id))]
    pub async fn remove_selection_from_list(
        &self,
        list_id: &ListId,
    ) -> Result<SyncReport, EngineError> {
        let selection = self.selection_for_bulk().await?;
        let report = self.shared.lists.remove(list_id, &selection).await?;
        if !report.is_complete() {
            warn!(failed = report.failed_removals.len(), "some members could not be removed");
        }
        self.after_bulk().await;
        Ok(report)
    }

    /// Makes `list_id` contain exactly `desired`, then reloads.
    pub async fn sync_list_members(
        &self,
        list_id: &ListId,
        desired: &BTreeSet<EntityId>,
    ) -> Result<SyncReport, EngineError> {
        self.require(Feature::ListManagement)?;
        let report = self.shared.lists.execute(list_id, desired).await?;
        self.reload_quietly().await;
        Ok(report)
    }

    async fn after_bulk(&self) {
        self.clear_selection().await;
        self.reload_quietly().await;
    }

    /// Reload after a successful write. Its failure is recorded in
    /// `last_error` and does not fail the write.
    async fn reload_quietly(&self) {
        if let Err(err) = self.reload().await {
            debug!(error = %err, "reload after write failed");
        }
    }

    // ---- forms ---------------------------------------------------------

    pub async fn open_create(&self) {
        let form = FormState::create(&self.shared.config.fields.form);
        self.shared.state.lock().await.form = Some(form);
    }

    /// Opens the edit form for a record on the current page.
    pub async fn open_edit(&self, id: &EntityId) -> Result<(), EngineError> {
        let config = &self.shared.config;
        let mut state = self.shared.state.lock().await;
        let record = state
            .records
            .iter()
            .find(|r| r.id(&config.id_field).as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| EngineError::RecordNotFound(id.clone()))?;
        state.form = Some(FormState::edit(id.clone(), &record, &config.fields.form));
        Ok(())
    }

    pub async fn form(&self) -> Option<FormState> {
        self.shared.state.lock().await.form.clone()
    }

    pub async fn set_field(&self, name: &str, value: Value) -> Result<(), EngineError> {
        let mut state = self.shared.state.lock().await;
        let form = state.form.as_mut().ok_or(EngineError::NoOpenForm)?;
        form.set(name, value);
        Ok(())
    }

    /// Adds a trimmed tag to the open form. Blank and duplicate tags are ignored.
    pub async fn add_tag(&self, field: &str, tag: &str) -> Result<bool, EngineError> {
        self.require(Feature::Tags)?;
        let mut state = self.shared.state.lock().await;
        let form = state.form.as_mut().ok_or(EngineError::NoOpenForm)?;
        Ok(form.add_tag(field, tag))
    }

    pub async fn remove_tag(&self, field: &str, tag: &str) -> Result<bool, EngineError> {
        self.require(Feature::Tags)?;
        let mut state = self.shared.state.lock().await;
        let form = state.form.as_mut().ok_or(EngineError::NoOpenForm)?;
        Ok(form.remove_tag(field, tag))
    }

    pub async fn cancel_form(&self) {
        self.shared.state.lock().await.form = None;
    }

    /// Submits the open form.
    ///
    /// Validation runs before any request. On success the form closes and the
    /// current page is reloaded; on failure the form stays open as typed.
    #[tracing::instrument(
        name = "usecase.entity_engine.submit",
        skip(self),
        fields(entity = %self.shared.config.entity_type)
    )]
    pub async fn submit(&self) -> Result<Value, EngineError> {
        let shared = &self.shared;
        let config = &shared.config;

        let (mode, body) = {
            let mut state = shared.state.lock().await;
            let form = state.form.as_ref().ok_or(EngineError::NoOpenForm)?;
            let mode = form.mode().clone();
            match form.serialize(&config.fields.form) {
                Ok(body) => (mode, body),
                Err(err) => {
                    let err = EngineError::from(err);
                    state.last_error = Some(err.clone());
                    return Err(err);
                }
            }
        };

        let body = match &shared.transform {
            Some(transform) => transform.transform(config, &mode, body),
            None => body,
        };
        let body = Value::Object(body);

        let (result, fallback) = match &mode {
            FormMode::Create => (
                shared.api.create(&config.api_endpoint, &body).await,
                "Failed to create record",
            ),
            FormMode::Edit(id) => (
                shared.api.update(&config.api_endpoint, id, &body).await,
                "Failed to update record",
            ),
        };

        match result {
            Ok(response) => {
                {
                    let mut state = shared.state.lock().await;
                    state.form = None;
                    state.last_error = None;
                }
                info!(mode = ?mode, "record saved");
                self.reload_quietly().await;
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "save failed");
                let err = EngineError::Write {
                    message: err.user_message(fallback),
                };
                shared.state.lock().await.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ---- delete / undo -------------------------------------------------

    /// Deletes (or archives) a record, arming undo when the server returns
    /// the deleted item. Returns whether undo was armed.
    #[tracing::instrument(name = "usecase.entity_engine.delete", skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &EntityId) -> Result<bool, EngineError> {
        let shared = &self.shared;
        let config = &shared.config;

        match shared.api.delete(&config.api_endpoint, id).await {
            Ok(body) => {
                let deleted_item = body
                    .as_ref()
                    .and_then(|b| b.get("deletedItem"))
                    .filter(|item| !item.is_null())
                    .cloned();
                let armed = match deleted_item {
                    Some(item) if config.has(Feature::UndoDelete) => {
                        shared.undo.arm(id.clone(), item);
                        true
                    }
                    _ => false,
                };
                shared.state.lock().await.selection.remove(id);
                info!(mode = config.delete_mode.action_label(), armed, "record deleted");
                self.reload_quietly().await;
                Ok(armed)
            }
            Err(err) => {
                warn!(error = %err, "delete failed");
                let fallback = format!(
                    "Failed to {} record",
                    config.delete_mode.action_label().to_lowercase()
                );
                let err = EngineError::Write {
                    message: err.user_message(&fallback),
                };
                shared.state.lock().await.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Restores the most recently deleted record if its window is open.
    pub async fn undo_delete(&self) -> Result<(), EngineError> {
        self.require(Feature::UndoDelete)?;
        match self.shared.undo.undo().await {
            Ok(true) => {
                self.reload_quietly().await;
                Ok(())
            }
            Ok(false) => Err(EngineError::NothingToUndo),
            Err(err) => {
                let err = EngineError::Write {
                    message: err.user_message("Failed to restore record"),
                };
                self.shared.state.lock().await.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ---- custom actions ------------------------------------------------

    #[tracing::instrument(name = "usecase.entity_engine.custom_action", skip(self), fields(id = %id))]
    pub async fn run_custom_action(&self, key: &str, id: &EntityId) -> Result<Value, EngineError> {
        self.require(Feature::CustomActions)?;
        let config = &self.shared.config;
        let action = config
            .action(key)
            .ok_or_else(|| EngineError::UnknownAction(key.to_string()))?;

        match self
            .shared
            .api
            .invoke_action(&config.api_endpoint, id, action)
            .await
        {
            Ok(response) => {
                info!(action = %action.key, "custom action completed");
                self.reload_quietly().await;
                Ok(response)
            }
            Err(err) => {
                let err = EngineError::Write {
                    message: err.user_message(&format!("Failed to {}", action.label.to_lowercase())),
                };
                self.shared.state.lock().await.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ---- snapshot / teardown -------------------------------------------

    /// Snapshot of everything a table widget renders.
    pub async fn view(&self) -> EntityView {
        let shared = &self.shared;
        let config = &shared.config;
        let dropdowns = &shared.dropdowns;
        let lookup = |field: &FieldSpec, raw: &Value| dropdowns.label_for(field, raw);

        let undo = shared.undo.snapshot().and_then(|snapshot| {
            shared.undo.remaining().map(|left| UndoView {
                id: snapshot.id,
                remaining_ms: u64::try_from(left.as_millis()).unwrap_or(u64::MAX),
            })
        });

        let state = shared.state.lock().await;

        let rows = state
            .records
            .iter()
            .map(|record| {
                let id = record.id(&config.id_field);
                RowView {
                    selected: id.as_ref().is_some_and(|id| state.selection.contains(id)),
                    id,
                    cells: config
                        .fields
                        .display
                        .iter()
                        .map(|field| format_cell(field, record, &lookup))
                        .collect(),
                }
            })
            .collect();

        let form = state.form.as_ref().map(|form| {
            let (mode, record_id) = FormView::mode_parts(form.mode());
            FormView {
                mode,
                record_id,
                fields: config
                    .fields
                    .form
                    .iter()
                    .map(|field| FormFieldView {
                        name: field.name.clone(),
                        label: field.label.clone(),
                        field_type: field.field_type,
                        required: field.required,
                        value: form.get(&field.name).cloned().unwrap_or(Value::Null),
                        options: if field.field_type == FieldType::Select {
                            dropdowns.options_for(field)
                        } else {
                            Vec::new()
                        },
                    })
                    .collect(),
            }
        });

        EntityView {
            entity_type: config.entity_type.clone(),
            title: config.title.clone(),
            capabilities: config.features.iter().copied().collect(),
            delete_label: config.delete_mode.action_label(),
            columns: EntityView::columns(config),
            rows,
            pagination: state.pagination,
            can_go_previous: state.pagination.can_go_previous(),
            can_go_next: state.pagination.can_go_next(),
            filters: state
                .filters
                .active()
                .filter(|(key, _)| *key != SEARCH_KEY)
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            active_filter_count: state.filters.active_count(),
            filter_options: dropdowns.filter_options().cloned().unwrap_or_default(),
            search: state.filters.search().map(str::to_string),
            search_affordance: state.search,
            list_id: state.list_id.clone(),
            selection_count: state.selection.len(),
            actions: EntityView::actions(config),
            undo,
            form,
            loading: state.loading,
            last_error: state.last_error.as_ref().map(|err| ErrorView {
                message: err.to_string(),
                retryable: err.is_retryable(),
            }),
        }
    }

    /// Cancels the pending search and the undo countdown.
    pub fn shutdown(&self) {
        self.cancel_pending_search();
        self.shared.undo.shutdown();
        debug!(entity = %self.shared.config.entity_type, "engine shut down");
    }
}
