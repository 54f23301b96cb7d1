//! # ws-platform
//!
//! Host-side implementations for the widget shell.
//!
//! This crate contains the adapters that stand in for the page hosting the
//! shell: executing uploaded registration scripts, importing fetched widget
//! modules through object URLs, and relaying widget signals to the host.

pub mod host;
pub mod widgets;

pub use host::{ChannelHost, HostEvent, TracingHost};
pub use widgets::{
    InMemoryObjectUrlStore, ManifestModuleImporter, RegistrationScriptHost, TemplateWidget,
};
