use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::profile::ProfileKind;
use crate::ids::EntityId;
use crate::ports::ProfileNavigatorPort;

/// A renderable unit resolved by key.
///
/// `render` is pure: it turns props into a presentation-free view model that
/// the host paints.
pub trait WidgetComponent: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, props: &WidgetProps) -> Value;
}

/// "Open profile" callback bound to the host navigator.
#[derive(Clone)]
pub struct ProfileCallback {
    kind: ProfileKind,
    navigator: Arc<dyn ProfileNavigatorPort>,
}

impl ProfileCallback {
    pub fn new(kind: ProfileKind, navigator: Arc<dyn ProfileNavigatorPort>) -> Self {
        Self { kind, navigator }
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn invoke(&self, id: &EntityId) {
        self.navigator.open_profile(self.kind, id);
    }
}

impl std::fmt::Debug for ProfileCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCallback")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WidgetProps {
    pub values: Map<String, Value>,
    /// Keyed by handler name, e.g. `onOpenLeadProfile`.
    pub callbacks: BTreeMap<&'static str, ProfileCallback>,
}

impl WidgetProps {
    pub fn from_values(values: Map<String, Value>) -> Self {
        Self {
            values,
            callbacks: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn callback(&self, handler: &str) -> Option<&ProfileCallback> {
        self.callbacks.get(handler)
    }

    /// Handler names as a JSON array, for view models.
    pub fn callback_names(&self) -> Value {
        json!(self.callbacks.keys().collect::<Vec<_>>())
    }
}
