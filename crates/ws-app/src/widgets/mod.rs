//! Widget resolution: built-in registry, external loading, mounts.

mod components;
mod loader;
mod registry;
mod resolver;

pub use components::{EntityTableWidget, ProfileWidget, SearchResultWidget, TableHandle};
pub use loader::ExternalWidgetLoader;
pub use registry::WidgetRegistry;
pub use resolver::{
    ResolveContext, ResolverDeps, ResolverSettings, WidgetMount, WidgetResolver,
};
