pub mod config;
pub mod run;
pub mod runtime;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_store, resolve_config_path};
pub use run::{run_app, Cli};
pub use runtime::{AppRuntime, UseCases};
pub use wiring::{wire_dependencies, HostPorts};
