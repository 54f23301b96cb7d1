use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::component::WidgetComponent;

/// Registry that externally loaded scripts register themselves into.
///
/// One instance is shared (by `Arc`) between the script host that executes
/// uploads and the loader that checks for the expected key afterwards.
/// Re-registering a key overwrites the previous component.
#[derive(Clone, Default)]
pub struct ExternalWidgetRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<dyn WidgetComponent>>>>,
}

impl ExternalWidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the component previously registered under `key`, if any.
    pub fn register(
        &self,
        key: impl Into<String>,
        component: Arc<dyn WidgetComponent>,
    ) -> Option<Arc<dyn WidgetComponent>> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(key.into(), component)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn WidgetComponent>> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for ExternalWidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalWidgetRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
