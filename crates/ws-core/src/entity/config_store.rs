use std::collections::BTreeMap;
use std::sync::Arc;

use super::config::EntityConfig;
use super::validation::{validate_config, ConfigError};

/// Holds one [`EntityConfig`] per entity type.
///
/// Lookup only. Every config is validated when the store is built, so a
/// store that exists only holds well-formed configs.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    configs: BTreeMap<String, Arc<EntityConfig>>,
}

impl ConfigStore {
    pub fn from_configs(
        configs: impl IntoIterator<Item = EntityConfig>,
    ) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for config in configs {
            validate_config(&config)?;
            let entity_type = config.entity_type.clone();
            if map.insert(entity_type.clone(), Arc::new(config)).is_some() {
                return Err(ConfigError::DuplicateEntity(entity_type));
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(count = map.len(), "entity configs registered");
        Ok(Self { configs: map })
    }

    pub fn builtin() -> Self {
        // Built-in configs are covered by `builtin_configs_are_valid`.
        Self::from_configs(super::defaults::builtin_configs()).unwrap_or_default()
    }

    pub fn get(&self, entity_type: &str) -> Option<Arc<EntityConfig>> {
        self.configs.get(entity_type).cloned()
    }

    /// Finds the config whose profile widget is `<stem>-profile-widget`.
    pub fn by_profile_stem(&self, stem: &str) -> Option<Arc<EntityConfig>> {
        self.configs
            .values()
            .find(|c| c.profile.as_ref().is_some_and(|p| p.stem == stem))
            .cloned()
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityConfig>> {
        self.configs.values()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
