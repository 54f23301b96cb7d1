//! Widget domain: descriptors, key conventions and render outcomes.

pub mod component;
pub mod descriptor;
pub mod external_registry;
pub mod key;
pub mod lifecycle;
pub mod outcome;
pub mod profile;

pub use component::{ProfileCallback, WidgetComponent, WidgetProps};
pub use descriptor::{Provenance, SpinnerSize, WidgetDescriptor};
pub use external_registry::ExternalWidgetRegistry;
pub use key::{
    base_key, is_search_result, profile_stem, split_key, PROFILE_WIDGET_SUFFIX,
    SEARCH_RESULT_PREFIX,
};
pub use lifecycle::MountSignals;
pub use outcome::{RenderOutcome, UnknownWidget};
pub use profile::{ProfileKind, PROFILE_HANDLERS};
