//! Static key → component mapping for built-in widgets.

use std::collections::BTreeMap;
use std::sync::Arc;

use ws_core::entity::{ConfigStore, EntityConfig};
use ws_core::widget::WidgetComponent;

use super::components::{EntityTableWidget, ProfileWidget, TableHandle};
use crate::entity::EntityEngine;

/// Built-in widgets, keyed by their full registry key.
///
/// Every entity type gets a `<type>-widget` table; types with a profile also
/// get a `<stem>-profile-widget`.
#[derive(Default)]
pub struct WidgetRegistry {
    components: BTreeMap<String, Arc<dyn WidgetComponent>>,
    tables: BTreeMap<String, TableHandle>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the table and profile widgets of every config in `store`.
    /// `engine_for` builds the engine backing each table.
    pub fn builtin<F>(store: &ConfigStore, mut engine_for: F) -> Self
    where
        F: FnMut(Arc<EntityConfig>) -> EntityEngine,
    {
        let mut registry = Self::new();
        for config in store.iter() {
            let table = Arc::new(EntityTableWidget::new(engine_for(config.clone())));
            registry
                .tables
                .insert(config.entity_type.clone(), table.clone());
            registry.register(config.widget_key(), table);

            if let Some(profile) = &config.profile {
                let key = profile.widget_key();
                let widget = ProfileWidget::new(config, profile.kind, key.clone());
                registry.register(key, Arc::new(widget));
            }
        }
        registry
    }

    /// Returns the component previously registered under `key`, if any.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        component: Arc<dyn WidgetComponent>,
    ) -> Option<Arc<dyn WidgetComponent>> {
        self.components.insert(key.into(), component)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn WidgetComponent>> {
        self.components.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.components.contains_key(key)
    }

    /// Sorted registry keys.
    pub fn keys(&self) -> Vec<String> {
        self.components.keys().cloned().collect()
    }

    pub fn table(&self, entity_type: &str) -> Option<TableHandle> {
        self.tables.get(entity_type).cloned()
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableHandle> {
        self.tables.values()
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
