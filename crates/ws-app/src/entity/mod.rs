//! The generic entity engine and what it renders from.

mod dropdowns;
mod engine;
mod transform;
mod view;

pub use dropdowns::DropdownCache;
pub use engine::{EngineDeps, EngineSettings, EntityEngine, LoadOutcome};
pub use transform::{CreateDefaults, SubmitTransform};
pub use view::{
    ActionView, ColumnView, EntityView, ErrorView, FormFieldView, FormView, RowView,
    SearchAffordance, UndoView,
};
