//! Declarative widget manifests.
//!
//! Widget code that is not compiled into the shell ships as a JSON manifest:
//! a name plus a view-model template whose `{{path}}` placeholders are filled
//! from the widget's props at render time.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use ws_core::widget::{WidgetComponent, WidgetProps};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid widget manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("widget manifest has an empty name")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WidgetManifest {
    pub name: String,
    #[serde(default)]
    pub template: Value,
}

impl WidgetManifest {
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_value(value)?;
        if manifest.name.trim().is_empty() {
            return Err(ManifestError::EmptyName);
        }
        Ok(manifest)
    }
}

/// Component rendering a manifest template.
#[derive(Debug, Clone)]
pub struct TemplateWidget {
    manifest: WidgetManifest,
}

impl TemplateWidget {
    pub fn new(manifest: WidgetManifest) -> Self {
        Self { manifest }
    }
}

impl WidgetComponent for TemplateWidget {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn render(&self, props: &WidgetProps) -> Value {
        let mut view = fill(&self.manifest.template, &props.values);
        if let Value::Object(map) = &mut view {
            if !props.callbacks.is_empty() {
                map.insert("callbacks".to_string(), props.callback_names());
            }
        }
        view
    }
}

fn lookup<'a>(values: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = values.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn fill(template: &Value, values: &Map<String, Value>) -> Value {
    match template {
        Value::String(s) => fill_str(s, values),
        Value::Array(items) => Value::Array(items.iter().map(|v| fill(v, values)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), fill(v, values)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// A string that is exactly one placeholder takes the prop value as-is;
/// otherwise placeholders are substituted as text. Unknown paths become empty.
fn fill_str(s: &str, values: &Map<String, Value>) -> Value {
    if let Some(path) = s.strip_prefix("{{").and_then(|r| r.strip_suffix("}}")) {
        if !path.contains("{{") {
            return lookup(values, path.trim()).cloned().unwrap_or(Value::Null);
        }
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                match lookup(values, after[..end].trim()) {
                    Some(Value::String(text)) => out.push_str(text),
                    Some(Value::Null) | None => {}
                    Some(other) => out.push_str(&other.to_string()),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Value::String(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget(template: Value) -> TemplateWidget {
        TemplateWidget::new(WidgetManifest::from_value(json!({"name": "t", "template": template})).unwrap())
    }

    #[test]
    fn whole_placeholder_keeps_json_type() {
        let props = WidgetProps::from_values(json!({"count": 3}).as_object().cloned().unwrap());
        assert_eq!(widget(json!({"n": "{{count}}"})).render(&props), json!({"n": 3}));
    }

    #[test]
    fn inline_placeholders_substitute_text() {
        let props = WidgetProps::from_values(
            json!({"widgetData": {"city": "Oslo"}, "temp": 4})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let view = widget(json!({"title": "{{widgetData.city}}: {{temp}}°, {{missing}}ok"}))
            .render(&props);
        assert_eq!(view, json!({"title": "Oslo: 4°, ok"}));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = WidgetManifest::from_value(json!({"name": " "})).unwrap_err();
        assert!(matches!(err, ManifestError::EmptyName));
    }
}
