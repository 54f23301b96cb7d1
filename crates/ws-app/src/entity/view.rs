//! Presentation-free snapshot of an engine, consumed by the table widget.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use ws_core::entity::{
    DisplayCell, EntityConfig, Feature, FormMode, PaginationState, SelectOption,
};
use ws_core::ids::{EntityId, ListId};

/// Whether the search box has been used, for UI affordances only.
///
/// Query semantics never depend on this: a cleared search and one never
/// entered both send no `search` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchAffordance {
    #[default]
    NeverSearched,
    Active,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: Option<EntityId>,
    pub selected: bool,
    pub cells: Vec<DisplayCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoView {
    pub id: EntityId,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldView {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: ws_core::entity::FieldType,
    pub required: bool,
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    /// `create` or `edit`.
    pub mode: &'static str,
    pub record_id: Option<EntityId>,
    pub fields: Vec<FormFieldView>,
}

impl FormView {
    pub(crate) fn mode_parts(mode: &FormMode) -> (&'static str, Option<EntityId>) {
        match mode {
            FormMode::Create => ("create", None),
            FormMode::Edit(id) => ("edit", Some(id.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionView {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityView {
    pub entity_type: String,
    pub title: String,
    pub capabilities: Vec<Feature>,
    pub delete_label: &'static str,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub pagination: PaginationState,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub filters: BTreeMap<String, String>,
    pub active_filter_count: usize,
    pub filter_options: Map<String, Value>,
    pub search: Option<String>,
    pub search_affordance: SearchAffordance,
    pub list_id: Option<ListId>,
    pub selection_count: usize,
    pub actions: Vec<ActionView>,
    pub undo: Option<UndoView>,
    pub form: Option<FormView>,
    pub loading: bool,
    pub last_error: Option<ErrorView>,
}

impl EntityView {
    pub(crate) fn columns(config: &EntityConfig) -> Vec<ColumnView> {
        config
            .fields
            .display
            .iter()
            .map(|f| ColumnView {
                name: f.name.clone(),
                label: f.label.clone(),
            })
            .collect()
    }

    pub(crate) fn actions(config: &EntityConfig) -> Vec<ActionView> {
        if !config.has(Feature::CustomActions) {
            return Vec::new();
        }
        config
            .custom_actions
            .iter()
            .map(|a| ActionView {
                key: a.key.clone(),
                label: a.label.clone(),
                confirm: a.confirm.clone(),
            })
            .collect()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
