//! Response-shape adapters.
//!
//! Upstream endpoints are inconsistent: some nest the collection under the
//! configured data key, others under `data`. Dropdown sources are worse and
//! may return bare arrays or wrap them under assorted keys. Both adapters
//! live here, explicitly, instead of being papered over at call sites.

use serde_json::Value;
use thiserror::Error;

use super::pagination::{PaginationState, PaginationWire};
use super::record::EntityRecord;

/// Fallback key used by endpoints that ignore the configured data key.
pub const DEFAULT_DATA_KEY: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionShape {
    /// Records found under the configured data key.
    Keyed,
    /// Records found under `data`.
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    pub records: Vec<EntityRecord>,
    pub pagination: PaginationState,
    pub shape: CollectionShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("response has neither `{data_key}` nor `data` array")]
    MissingCollection { data_key: String },
}

/// Extracts one page of records.
///
/// The configured key wins; `data` is consulted only when the configured
/// key holds no array. Records are never merged from both.
pub fn extract_collection(
    data_key: &str,
    body: &Value,
    requested_page: u32,
    items_per_page: u32,
) -> Result<CollectionPage, PayloadError> {
    let (items, shape) = match body.get(data_key) {
        Some(Value::Array(items)) => (items, CollectionShape::Keyed),
        _ => match body.get(DEFAULT_DATA_KEY) {
            Some(Value::Array(items)) => (items, CollectionShape::Default),
            _ => {
                return Err(PayloadError::MissingCollection {
                    data_key: data_key.to_string(),
                })
            }
        },
    };

    let records: Vec<EntityRecord> = items
        .iter()
        .cloned()
        .filter_map(EntityRecord::from_value)
        .collect();

    let pagination = match body.get("pagination") {
        Some(raw) => {
            let wire: PaginationWire = serde_json::from_value(raw.clone()).unwrap_or_default();
            PaginationState::from_wire(wire, requested_page, items_per_page)
        }
        None => PaginationState::synthesize(records.len(), items_per_page),
    };

    Ok(CollectionPage {
        records,
        pagination,
        shape,
    })
}

/// How a dropdown source payload was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceShape {
    Array,
    Alias(String),
    /// Nothing usable; coerced to an empty collection.
    Coerced,
}

/// Coerces a dropdown source payload into a list of items. Never fails.
///
/// Non-array payloads are searched for the alias keys `data`, `items`,
/// `results` and the source name itself.
pub fn coerce_source(source: &str, body: Value) -> (Vec<Value>, SourceShape) {
    match body {
        Value::Array(items) => (items, SourceShape::Array),
        Value::Object(mut map) => {
            for alias in ["data", "items", "results", source] {
                if let Some(Value::Array(_)) = map.get(alias) {
                    if let Some(Value::Array(items)) = map.remove(alias) {
                        return (items, SourceShape::Alias(alias.to_string()));
                    }
                }
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(source, "dropdown source payload has no array; using empty list");
            (Vec::new(), SourceShape::Coerced)
        }
        _ => {
            #[cfg(feature = "tracing")]
            tracing::warn!(source, "dropdown source payload is not an object; using empty list");
            (Vec::new(), SourceShape::Coerced)
        }
    }
}
