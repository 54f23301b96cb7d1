//! Declarative entity configuration.
//!
//! An [`EntityConfig`] describes one business-object type: where its REST
//! collection lives, which fields are shown and edited, which filters exist
//! and which engine capabilities are switched on. It is pure data; the
//! generic engine in the application layer interprets it.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::undo::UndoPolicy;
use crate::widget::ProfileKind;

/// Engine capabilities an entity type may opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ListManagement,
    BulkSelection,
    Filtering,
    FilterOptions,
    UndoDelete,
    Tags,
    CustomActions,
}

/// Input/display kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Select,
    Textarea,
    Date,
    Number,
    Currency,
    Status,
    Tags,
    Email,
    Phone,
    Checkbox,
}

impl FieldType {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Currency)
    }
}

/// Named pure formatter applied when a field is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRender {
    Currency,
    Date,
    DateTime,
    Uppercase,
    Capitalize,
    Join,
    Truncate(usize),
}

/// A static option of a select field or filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Name of a dropdown-data collection resolved at render time.
    #[serde(default)]
    pub source: Option<String>,
    /// Key of a source item used as its human label.
    #[serde(default)]
    pub display_field: Option<String>,
    #[serde(default)]
    pub render: Option<FieldRender>,
    #[serde(default)]
    pub status_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl FieldSpec {
    pub fn new(name: &str, field_type: FieldType, label: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            label: label.to_string(),
            required: false,
            source: None,
            display_field: None,
            render: None,
            status_colors: BTreeMap::new(),
            options: Vec::new(),
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_source(mut self, source: &str, display_field: &str) -> Self {
        self.source = Some(source.to_string());
        self.display_field = Some(display_field.to_string());
        self
    }

    pub fn with_render(mut self, render: FieldRender) -> Self {
        self.render = Some(render);
        self
    }

    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    pub fn with_status_colors(mut self, colors: &[(&str, &str)]) -> Self {
        self.status_colors = colors
            .iter()
            .map(|(value, style)| (value.to_string(), style.to_string()))
            .collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    Select,
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionMethod {
    Post,
    Put,
}

/// A per-record action beyond CRUD, e.g. "convert lead".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub key: String,
    pub label: String,
    /// Path segment appended to the record URL.
    pub path: String,
    #[serde(default = "default_action_method")]
    pub method: ActionMethod,
    #[serde(default)]
    pub confirm: Option<String>,
}

fn default_action_method() -> ActionMethod {
    ActionMethod::Post
}

/// Server-side deletion semantics. The UI flow is identical; only the label differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    #[default]
    Hard,
    Archive,
}

impl DeleteMode {
    pub fn action_label(self) -> &'static str {
        match self {
            DeleteMode::Hard => "Delete",
            DeleteMode::Archive => "Archive",
        }
    }
}

/// Profile wiring of an entity type.
///
/// `id_field` names the key in a widget's auxiliary data that carries the
/// record id. It is declared, never derived from the entity name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub kind: ProfileKind,
    /// Leading part of the profile widget key: `<stem>-profile-widget`.
    pub stem: String,
    pub id_field: String,
}

impl ProfileSpec {
    pub fn widget_key(&self) -> String {
        format!("{}{}", self.stem, crate::widget::PROFILE_WIDGET_SUFFIX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldGroups {
    #[serde(default)]
    pub display: Vec<FieldSpec>,
    #[serde(default)]
    pub form: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Registry name of the entity type, e.g. `contacts`.
    pub entity_type: String,
    pub title: String,
    pub api_endpoint: String,
    pub data_key: String,
    /// Primary key of records in collection payloads.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default)]
    pub default_filters: BTreeMap<String, String>,
    #[serde(default)]
    pub features: BTreeSet<Feature>,
    #[serde(default)]
    pub fields: FieldGroups,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterSpec>,
    #[serde(default)]
    pub custom_actions: Vec<ActionSpec>,
    #[serde(default)]
    pub delete_mode: DeleteMode,
    #[serde(default)]
    pub profile: Option<ProfileSpec>,
    #[serde(default)]
    pub undo_policy: UndoPolicy,
    /// Overrides the policy's window for this entity type.
    #[serde(default)]
    pub undo_window_secs: Option<u64>,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_items_per_page() -> u32 {
    10
}

impl EntityConfig {
    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Registry key of the collection widget for this entity type.
    pub fn widget_key(&self) -> String {
        format!("{}-widget", self.entity_type)
    }

    pub fn undo_window(&self) -> Option<Duration> {
        self.undo_window_secs.map(Duration::from_secs)
    }

    /// Every dropdown source referenced by form fields, display fields or filters.
    pub fn sources(&self) -> BTreeSet<String> {
        self.fields
            .display
            .iter()
            .chain(self.fields.form.iter())
            .filter_map(|f| f.source.clone())
            .chain(self.filters.values().filter_map(|f| f.source.clone()))
            .collect()
    }

    pub fn action(&self, key: &str) -> Option<&ActionSpec> {
        self.custom_actions.iter().find(|a| a.key == key)
    }
}
