//! Entity domain: declarative configs and the pure data structures the
//! generic engine operates on.

pub mod config;
pub mod config_store;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod form;
pub mod format;
pub mod pagination;
pub mod payload;
pub mod query;
pub mod record;
pub mod validation;

pub use config::{
    ActionMethod, ActionSpec, DeleteMode, EntityConfig, Feature, FieldGroups, FieldRender,
    FieldSpec, FieldType, FilterSpec, FilterType, ProfileSpec, SelectOption,
};
pub use config_store::ConfigStore;
pub use error::EngineError;
pub use filter::{FilterState, SEARCH_KEY};
pub use form::{FormError, FormMode, FormState};
pub use format::{format_cell, DisplayCell};
pub use pagination::{PaginationState, PaginationWire};
pub use payload::{
    coerce_source, extract_collection, CollectionPage, CollectionShape, PayloadError,
    SourceShape, DEFAULT_DATA_KEY,
};
pub use query::CollectionQuery;
pub use record::EntityRecord;
pub use validation::{validate_config, ConfigError};
