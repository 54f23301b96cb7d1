//! Schema validation for entity configurations.
//!
//! Runs once, when a [`ConfigStore`](super::ConfigStore) is built. After that
//! configs are treated as trusted, immutable data.

use std::collections::HashSet;

use thiserror::Error;

use super::config::{EntityConfig, Feature, FieldSpec, FieldType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("entity `{entity}`: `{field}` must not be empty")]
    EmptyAttribute { entity: String, field: &'static str },

    #[error("entity `{entity}`: duplicate {group} field `{name}`")]
    DuplicateField {
        entity: String,
        group: &'static str,
        name: String,
    },

    #[error("entity `{entity}`: select field `{name}` needs a source or static options")]
    SelectWithoutOptions { entity: String, name: String },

    #[error("entity `{entity}`: feature `{feature:?}` is enabled but {reason}")]
    FeatureMisconfigured {
        entity: String,
        feature: Feature,
        reason: &'static str,
    },

    #[error("entity `{entity}`: items_per_page must be greater than zero")]
    ZeroPageSize { entity: String },

    #[error("duplicate entity type `{0}`")]
    DuplicateEntity(String),
}

pub fn validate_config(config: &EntityConfig) -> Result<(), ConfigError> {
    let entity = config.entity_type.as_str();
    for (field, value) in [
        ("entity_type", config.entity_type.as_str()),
        ("title", config.title.as_str()),
        ("api_endpoint", config.api_endpoint.as_str()),
        ("data_key", config.data_key.as_str()),
        ("id_field", config.id_field.as_str()),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyAttribute {
                entity: entity.to_string(),
                field,
            });
        }
    }

    if config.items_per_page == 0 {
        return Err(ConfigError::ZeroPageSize {
            entity: entity.to_string(),
        });
    }

    validate_fields(entity, "display", &config.fields.display)?;
    validate_fields(entity, "form", &config.fields.form)?;

    if config.has(Feature::CustomActions) && config.custom_actions.is_empty() {
        return Err(ConfigError::FeatureMisconfigured {
            entity: entity.to_string(),
            feature: Feature::CustomActions,
            reason: "no custom actions are declared",
        });
    }
    if config.has(Feature::Filtering) && config.filters.is_empty() {
        return Err(ConfigError::FeatureMisconfigured {
            entity: entity.to_string(),
            feature: Feature::Filtering,
            reason: "no filters are declared",
        });
    }
    if config.has(Feature::Tags)
        && !config
            .fields
            .form
            .iter()
            .any(|f| f.field_type == FieldType::Tags)
    {
        return Err(ConfigError::FeatureMisconfigured {
            entity: entity.to_string(),
            feature: Feature::Tags,
            reason: "no form field has type `tags`",
        });
    }
    if let Some(profile) = &config.profile {
        if profile.stem.trim().is_empty() || profile.id_field.trim().is_empty() {
            return Err(ConfigError::EmptyAttribute {
                entity: entity.to_string(),
                field: "profile",
            });
        }
    }
    Ok(())
}

fn validate_fields(
    entity: &str,
    group: &'static str,
    fields: &[FieldSpec],
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(ConfigError::EmptyAttribute {
                entity: entity.to_string(),
                field: "fields.name",
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField {
                entity: entity.to_string(),
                group,
                name: field.name.clone(),
            });
        }
        // Display columns may show a select value verbatim; forms need choices.
        if group == "form"
            && field.field_type == FieldType::Select
            && field.source.is_none()
            && field.options.is_empty()
        {
            return Err(ConfigError::SelectWithoutOptions {
                entity: entity.to_string(),
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}
