mod loader;

pub use loader::{load_entity_configs, load_shell_config};
