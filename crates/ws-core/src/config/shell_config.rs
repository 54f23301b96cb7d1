//! Shell configuration domain model
//!
//! Pure data. Every section and value is optional in the TOML source and
//! falls back to [`ShellConfig::default`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::undo::UndoPolicy;
use crate::widget::SpinnerSize;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub api: ApiConfig,
    pub widgets: WidgetsConfig,
    pub engine: EngineConfig,
    pub undo: UndoConfig,
    pub entities: EntitiesConfig,
    pub logging: LoggingConfig,
}

/// REST collaborator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin the `/api/...` paths are resolved against
    pub base_url: String,
    /// Pre-established session cookie (`name=value`), if the host has one
    pub session_cookie: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            session_cookie: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetsConfig {
    pub spinner_size: SpinnerSize,
    /// Delay between first paint and the "ready" signal
    pub ready_delay_ms: u64,
}

impl Default for WidgetsConfig {
    fn default() -> Self {
        Self {
            spinner_size: SpinnerSize::Medium,
            ready_delay_ms: 100,
        }
    }
}

impl WidgetsConfig {
    pub fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search_debounce_ms: u64,
    /// Overrides every entity config's page size when set
    pub items_per_page: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            items_per_page: None,
        }
    }
}

impl EngineConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Undo windows per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    pub generic_window_secs: u64,
    pub tasks_window_secs: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            generic_window_secs: UndoPolicy::Generic.default_window().as_secs(),
            tasks_window_secs: UndoPolicy::Tasks.default_window().as_secs(),
        }
    }
}

impl UndoConfig {
    pub fn window(&self, policy: UndoPolicy) -> Duration {
        match policy {
            UndoPolicy::Generic => Duration::from_secs(self.generic_window_secs),
            UndoPolicy::Tasks => Duration::from_secs(self.tasks_window_secs),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitiesConfig {
    /// TOML file with `[[entity]]` tables; built-in configs are used when unset
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set
    pub level: Option<String>,
    /// Directory for rolling log files; stdout only when unset
    pub dir: Option<PathBuf>,
}

impl ShellConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
