use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Undo windows, named per feature.
///
/// The generic entity path and the task path use different windows. They
/// are kept as separate constants so either can change without the other.
pub struct UndoWindow;

impl UndoWindow {
    pub const GENERIC: Duration = Duration::from_secs(10);
    pub const TASKS: Duration = Duration::from_secs(5);
}

/// Which undo window an entity type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoPolicy {
    #[default]
    Generic,
    Tasks,
}

impl UndoPolicy {
    pub fn default_window(self) -> Duration {
        match self {
            UndoPolicy::Generic => UndoWindow::GENERIC,
            UndoPolicy::Tasks => UndoWindow::TASKS,
        }
    }
}
