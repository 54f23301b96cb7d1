//! Widget Shell Application Layer
//!
//! Use cases driving the domain in `ws-core` through its ports: widget
//! resolution and external loading, the config-driven entity engine, list
//! membership and undo-delete.

pub mod deps;
pub mod entity;
pub mod lists;
pub mod undo;
pub mod widgets;

#[cfg(test)]
mod test_support;

pub use deps::AppDeps;
pub use entity::{EngineDeps, EngineSettings, EntityEngine, EntityView};
pub use lists::{ListManager, ListMembershipSynchronizer};
pub use undo::UndoDeleteManager;
pub use widgets::{ExternalWidgetLoader, WidgetMount, WidgetRegistry, WidgetResolver};
