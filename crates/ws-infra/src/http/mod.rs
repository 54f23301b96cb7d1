//! REST collaborator adapters.

mod client;
mod entity_api;
mod list_api;
mod module_source;

pub use client::RestClient;
pub use entity_api::HttpEntityApi;
pub use list_api::HttpListApi;
pub use module_source::HttpModuleSource;
