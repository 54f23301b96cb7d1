use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where a widget's code comes from.
///
/// Closed set: adding a provenance forces every resolver branch to be revisited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "kebab-case")]
pub enum Provenance {
    /// Compiled into the registry, looked up by exact key.
    Builtin,
    /// Compiled into the registry, looked up by base key, with auxiliary data.
    BuiltinReact {
        #[serde(default)]
        widget_data: Map<String, Value>,
    },
    /// Third-party script that registers itself into the shared registry.
    Uploaded { path: String },
    /// Same-origin module whose default export is the component.
    Fetched { path: String },
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Builtin => "builtin",
            Provenance::BuiltinReact { .. } => "builtin-react",
            Provenance::Uploaded { .. } => "uploaded",
            Provenance::Fetched { .. } => "fetched",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub key: String,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl WidgetDescriptor {
    pub fn builtin(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            provenance: Provenance::Builtin,
        }
    }

    pub fn builtin_react(key: impl Into<String>, widget_data: Map<String, Value>) -> Self {
        Self {
            key: key.into(),
            provenance: Provenance::BuiltinReact { widget_data },
        }
    }

    pub fn uploaded(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            provenance: Provenance::Uploaded { path: path.into() },
        }
    }

    pub fn fetched(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            provenance: Provenance::Fetched { path: path.into() },
        }
    }
}

/// Spinner size the host uses while an external widget loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinnerSize {
    Small,
    #[default]
    Medium,
    Large,
}
