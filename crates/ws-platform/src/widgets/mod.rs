mod manifest;
mod module_importer;
mod object_url;
mod script_host;

pub use manifest::{ManifestError, TemplateWidget, WidgetManifest};
pub use module_importer::ManifestModuleImporter;
pub use object_url::InMemoryObjectUrlStore;
pub use script_host::RegistrationScriptHost;
