use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use ws_core::entity::{coerce_source, FieldSpec, SelectOption, SourceShape};
use ws_core::ports::EntityApiPort;

/// Key of a source item compared against the stored field value.
const VALUE_KEY: &str = "id";
/// Label key used when a field declares no `display_field`.
const DEFAULT_LABEL_KEY: &str = "name";

/// Dropdown data and filter options for one engine instance.
///
/// Each is fetched at most once per instance. Failures degrade to empty
/// data with a warning and are not retried.
pub struct DropdownCache {
    api: Arc<dyn EntityApiPort>,
    sources: OnceCell<HashMap<String, Vec<Value>>>,
    filter_options: OnceCell<Map<String, Value>>,
}

impl DropdownCache {
    pub fn new(api: Arc<dyn EntityApiPort>) -> Self {
        Self {
            api,
            sources: OnceCell::new(),
            filter_options: OnceCell::new(),
        }
    }

    /// Fetches every source concurrently. Later calls are no-ops.
    pub async fn prefetch(&self, sources: &BTreeSet<String>) {
        self.sources
            .get_or_init(|| async {
                let fetches = sources.iter().map(|source| async move {
                    let items = match self.api.fetch_source(source).await {
                        Ok(body) => {
                            let (items, shape) = coerce_source(source, body);
                            if shape != SourceShape::Array {
                                debug!(%source, ?shape, "dropdown source coerced");
                            }
                            items
                        }
                        Err(err) => {
                            warn!(%source, error = %err, "dropdown source failed; using empty list");
                            Vec::new()
                        }
                    };
                    (source.clone(), items)
                });
                join_all(fetches).await.into_iter().collect()
            })
            .await;
    }

    /// Fetches `GET /{endpoint}/filter-options` once. Failure or a non-object
    /// body yields an empty map.
    pub async fn prefetch_filter_options(&self, endpoint: &str) {
        self.filter_options
            .get_or_init(|| async {
                match self.api.fetch_filter_options(endpoint).await {
                    Ok(Value::Object(map)) => map,
                    Ok(other) => {
                        warn!(%endpoint, kind = value_kind(&other), "filter options are not an object; ignoring");
                        Map::new()
                    }
                    Err(err) => {
                        warn!(%endpoint, error = %err, "filter options failed; ignoring");
                        Map::new()
                    }
                }
            })
            .await;
    }

    pub fn items(&self, source: &str) -> &[Value] {
        self.sources
            .get()
            .and_then(|s| s.get(source))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn filter_options(&self) -> Option<&Map<String, Value>> {
        self.filter_options.get()
    }

    /// Human label of `raw` through the field's source, if the item is known.
    pub fn label_for(&self, field: &FieldSpec, raw: &Value) -> Option<String> {
        let source = field.source.as_deref()?;
        let wanted = scalar_text(raw)?;
        let label_key = field.display_field.as_deref().unwrap_or(DEFAULT_LABEL_KEY);
        self.items(source)
            .iter()
            .find(|item| item.get(VALUE_KEY).and_then(scalar_text).as_deref() == Some(wanted.as_str()))
            .and_then(|item| item.get(label_key))
            .and_then(scalar_text)
    }

    /// Select options of a field: its static options, or its source items.
    pub fn options_for(&self, field: &FieldSpec) -> Vec<SelectOption> {
        let Some(source) = field.source.as_deref() else {
            return field.options.clone();
        };
        let label_key = field.display_field.as_deref().unwrap_or(DEFAULT_LABEL_KEY);
        self.items(source)
            .iter()
            .filter_map(|item| {
                Some(SelectOption {
                    value: item.get(VALUE_KEY).and_then(scalar_text)?,
                    label: item.get(label_key).and_then(scalar_text)?,
                })
            })
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
