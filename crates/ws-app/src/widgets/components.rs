//! Built-in widget components.

use std::sync::{Arc, RwLock};

use serde_json::{json, Map, Value};
use ws_core::entity::EntityConfig;
use ws_core::widget::{ProfileKind, WidgetComponent, WidgetProps};

use crate::entity::{EntityEngine, EntityView};

/// Table/form surface of one entity type.
///
/// Rendering is synchronous, so the widget paints the last snapshot taken
/// with [`EntityTableWidget::refresh`]. Before the first refresh it paints
/// the column headers with a loading flag.
pub struct EntityTableWidget {
    name: String,
    engine: EntityEngine,
    snapshot: RwLock<Option<EntityView>>,
}

impl EntityTableWidget {
    pub fn new(engine: EntityEngine) -> Self {
        Self {
            name: engine.config().widget_key(),
            engine,
            snapshot: RwLock::new(None),
        }
    }

    pub fn engine(&self) -> &EntityEngine {
        &self.engine
    }

    /// Takes a fresh snapshot of the engine.
    pub async fn refresh(&self) -> EntityView {
        let view = self.engine.view().await;
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(view.clone());
        view
    }

    fn placeholder(config: &EntityConfig) -> Value {
        json!({
            "entityType": config.entity_type,
            "title": config.title,
            "columns": EntityView::columns(config),
            "rows": [],
            "loading": true,
        })
    }
}

impl WidgetComponent for EntityTableWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &WidgetProps) -> Value {
        let view = self
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(EntityView::to_value)
            .unwrap_or_else(|| Self::placeholder(self.engine.config()));
        json!({
            "widget": "entity-table",
            "view": view,
            "props": props.values,
            "callbacks": props.callback_names(),
        })
    }
}

/// Profile card of one record. Receives only the record id.
pub struct ProfileWidget {
    name: String,
    kind: ProfileKind,
    entity_type: String,
}

impl ProfileWidget {
    pub fn new(config: &EntityConfig, kind: ProfileKind, name: String) -> Self {
        Self {
            name,
            kind,
            entity_type: config.entity_type.clone(),
        }
    }
}

impl WidgetComponent for ProfileWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &WidgetProps) -> Value {
        json!({
            "widget": "profile",
            "kind": self.kind,
            "entityType": self.entity_type,
            "id": props.values.get("id").cloned().unwrap_or(Value::Null),
            "callbacks": props.callback_names(),
        })
    }
}

/// Inline rendering of one search hit.
#[derive(Debug, Default)]
pub struct SearchResultWidget;

impl SearchResultWidget {
    pub const NAME: &'static str = "search-result";

    pub fn props(result: Option<Value>) -> WidgetProps {
        let mut values = Map::new();
        values.insert("result".to_string(), result.unwrap_or(Value::Null));
        WidgetProps::from_values(values)
    }
}

impl WidgetComponent for SearchResultWidget {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, props: &WidgetProps) -> Value {
        let result = props.values.get("result").cloned().unwrap_or(Value::Null);
        json!({
            "widget": Self::NAME,
            "title": result.get("title").or_else(|| result.get("name")).cloned(),
            "result": result,
        })
    }
}

/// Shared handle type used by the registry.
pub type TableHandle = Arc<EntityTableWidget>;
