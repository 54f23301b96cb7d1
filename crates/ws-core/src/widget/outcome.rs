use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use super::component::{WidgetComponent, WidgetProps};
use super::descriptor::SpinnerSize;

/// Diagnostic payload for a key nothing could satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownWidget {
    pub requested_key: String,
    pub base_key: String,
    pub known_keys: Vec<String>,
}

#[derive(Clone)]
pub enum RenderOutcome {
    Registered {
        component: Arc<dyn WidgetComponent>,
        props: WidgetProps,
    },
    Loading(SpinnerSize),
    Error(String),
    Unknown(UnknownWidget),
}

impl RenderOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, RenderOutcome::Loading(_))
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RenderOutcome::Registered { .. })
    }

    /// View model for whatever state the widget is in.
    ///
    /// Failures become inline diagnostic cards; nothing here panics or
    /// escapes to the host page.
    pub fn render(&self) -> Value {
        match self {
            RenderOutcome::Registered { component, props } => component.render(props),
            RenderOutcome::Loading(size) => json!({ "spinner": { "size": size } }),
            RenderOutcome::Error(message) => json!({
                "diagnostic": { "kind": "widget-load-error", "message": message }
            }),
            RenderOutcome::Unknown(unknown) => json!({
                "diagnostic": { "kind": "unknown-widget", "details": unknown }
            }),
        }
    }
}

impl std::fmt::Debug for RenderOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderOutcome::Registered { component, props } => f
                .debug_struct("Registered")
                .field("component", &component.name())
                .field("props", &props.values)
                .finish(),
            RenderOutcome::Loading(size) => f.debug_tuple("Loading").field(size).finish(),
            RenderOutcome::Error(message) => f.debug_tuple("Error").field(message).finish(),
            RenderOutcome::Unknown(unknown) => f.debug_tuple("Unknown").field(unknown).finish(),
        }
    }
}
