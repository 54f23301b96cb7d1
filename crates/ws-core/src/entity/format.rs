//! Display formatting of record values.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::{FieldRender, FieldSpec, FieldType};
use super::record::EntityRecord;

/// One formatted table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCell {
    pub field: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Formats `field` of `record`.
///
/// `lookup` resolves select values through dropdown data; it returns the
/// human label for a raw value, if known.
pub fn format_cell(
    field: &FieldSpec,
    record: &EntityRecord,
    lookup: &dyn Fn(&FieldSpec, &Value) -> Option<String>,
) -> DisplayCell {
    let raw = record.get(&field.name).cloned().unwrap_or(Value::Null);

    let text = if field.field_type == FieldType::Select && field.source.is_some() {
        lookup(field, &raw).unwrap_or_else(|| plain_text(&raw))
    } else {
        let render = field.render.clone().or(match field.field_type {
            FieldType::Currency => Some(FieldRender::Currency),
            FieldType::Date => Some(FieldRender::Date),
            FieldType::Tags => Some(FieldRender::Join),
            _ => None,
        });
        match render {
            Some(render) => apply_render(&render, &raw),
            None => plain_text(&raw),
        }
    };

    let style = match field.field_type {
        FieldType::Status => raw.as_str().and_then(|v| field.status_colors.get(v)).cloned(),
        _ => None,
    };

    DisplayCell {
        field: field.name.clone(),
        text,
        style,
    }
}

pub fn apply_render(render: &FieldRender, value: &Value) -> String {
    match render {
        FieldRender::Currency => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse::<f64>().ok()))
            .map(format_currency)
            .unwrap_or_else(|| plain_text(value)),
        FieldRender::Date => format_date(value, "%Y-%m-%d"),
        FieldRender::DateTime => format_date(value, "%Y-%m-%d %H:%M"),
        FieldRender::Uppercase => plain_text(value).to_uppercase(),
        FieldRender::Capitalize => {
            let text = plain_text(value);
            let mut chars = text.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        FieldRender::Join => match value {
            Value::Array(items) => items.iter().map(plain_text).collect::<Vec<_>>().join(", "),
            other => plain_text(other),
        },
        FieldRender::Truncate(max) => {
            let text = plain_text(value);
            if text.chars().count() > *max {
                let cut: String = text.chars().take(*max).collect();
                format!("{cut}…")
            } else {
                text
            }
        }
    }
}

pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        other => other.to_string(),
    }
}

fn format_date(value: &Value, pattern: &str) -> String {
    let Some(text) = value.as_str() else {
        return plain_text(value);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.format(pattern).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    text.to_string()
}

fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}
