//! Form state and its serialization against field specs.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::config::{FieldSpec, FieldType};
use super::record::EntityRecord;
use crate::ids::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("required fields are missing: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("field `{field}` expects a number, got `{value}`")]
    InvalidNumber { field: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// Values typed into the create/edit form.
///
/// Kept intact when a submission fails so the user can retry.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    mode: FormMode,
    values: Map<String, Value>,
}

impl FormState {
    pub fn create(fields: &[FieldSpec]) -> Self {
        let values = fields
            .iter()
            .map(|field| (field.name.clone(), empty_value(field.field_type)))
            .collect();
        Self {
            mode: FormMode::Create,
            values,
        }
    }

    pub fn edit(id: EntityId, record: &EntityRecord, fields: &[FieldSpec]) -> Self {
        let values = fields
            .iter()
            .map(|field| {
                let value = record
                    .get(&field.name)
                    .filter(|v| !v.is_null())
                    .cloned()
                    .unwrap_or_else(|| empty_value(field.field_type));
                (field.name.clone(), value)
            })
            .collect();
        Self {
            mode: FormMode::Edit(id),
            values,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn tags(&self, field: &str) -> Vec<String> {
        match self.values.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Adds a tag unless it is blank or already present. Returns whether it was added.
    pub fn add_tag(&mut self, field: &str, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        let mut tags = self.tags(field);
        if tags.iter().any(|t| t == tag) {
            return false;
        }
        tags.push(tag.to_string());
        self.set(field, tags_value(tags));
        true
    }

    pub fn remove_tag(&mut self, field: &str, tag: &str) -> bool {
        let tags = self.tags(field);
        let before = tags.len();
        let kept: Vec<String> = tags.into_iter().filter(|t| t != tag).collect();
        let removed = kept.len() != before;
        self.set(field, tags_value(kept));
        removed
    }

    /// Serializes the form into a request body.
    ///
    /// Blank optional fields are omitted; blank required fields fail the
    /// whole submission before any request is made.
    pub fn serialize(&self, fields: &[FieldSpec]) -> Result<Map<String, Value>, FormError> {
        let mut body = Map::new();
        let mut missing = Vec::new();

        for field in fields {
            let raw = self.values.get(&field.name).cloned().unwrap_or(Value::Null);
            match serialize_value(field, raw)? {
                Some(value) => {
                    body.insert(field.name.clone(), value);
                }
                None if field.required => missing.push(field.name.clone()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(FormError::MissingRequired(missing));
        }
        Ok(body)
    }
}

fn empty_value(field_type: FieldType) -> Value {
    match field_type {
        FieldType::Tags => Value::Array(Vec::new()),
        FieldType::Checkbox => Value::Bool(false),
        _ => Value::String(String::new()),
    }
}

fn tags_value(tags: Vec<String>) -> Value {
    Value::Array(tags.into_iter().map(Value::String).collect())
}

/// `Ok(None)` means "blank".
fn serialize_value(field: &FieldSpec, raw: Value) -> Result<Option<Value>, FormError> {
    match field.field_type {
        FieldType::Checkbox => Ok(Some(Value::Bool(match raw {
            Value::Bool(b) => b,
            Value::String(s) => s == "true",
            _ => false,
        }))),
        FieldType::Tags => {
            let mut tags: Vec<String> = Vec::new();
            if let Value::Array(items) = raw {
                for tag in items.iter().filter_map(Value::as_str).map(str::trim) {
                    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                        tags.push(tag.to_string());
                    }
                }
            }
            if tags.is_empty() && field.required {
                return Ok(None);
            }
            Ok(Some(tags_value(tags)))
        }
        FieldType::Number | FieldType::Currency => match raw {
            Value::Number(n) => Ok(Some(Value::Number(n))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_number(&field.name, s.trim()).map(Some),
            Value::Null => Ok(None),
            other => Err(FormError::InvalidNumber {
                field: field.name.clone(),
                value: other.to_string(),
            }),
        },
        _ => match raw {
            Value::Null => Ok(None),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(trimmed.to_string())))
                }
            }
            // Select values from dropdown sources are often numeric ids.
            other => Ok(Some(other)),
        },
    }
}

fn parse_number(field: &str, text: &str) -> Result<Value, FormError> {
    if let Ok(int) = text.parse::<i64>() {
        return Ok(Value::Number(int.into()));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| FormError::InvalidNumber {
            field: field.to_string(),
            value: text.to_string(),
        })
}
