//! # ws-core
//!
//! Core domain models and business logic for the widget shell.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! entity configuration, filter/pagination/form state, the membership diff,
//! the undo-delete state machine, widget descriptors and the ports the
//! application layer drives.

// Public module exports
pub mod config;
pub mod entity;
pub mod ids;
pub mod list;
pub mod ports;
pub mod undo;
pub mod widget;

// Re-export commonly used types at the crate root
pub use config::ShellConfig;
pub use entity::{
    ConfigStore, EngineError, EntityConfig, EntityRecord, Feature, FilterState, PaginationState,
};
pub use ids::{EntityId, ListId, MembershipId};
pub use list::{EntityList, ListMember, ListSyncError, MembershipDiff, SyncReport};
pub use ports::{ApiError, WidgetLoadError};
pub use undo::{DeletedSnapshot, UndoPolicy, UndoState, UndoWindow};
pub use widget::{Provenance, RenderOutcome, WidgetComponent, WidgetDescriptor, WidgetProps};
