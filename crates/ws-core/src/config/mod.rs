pub mod shell_config;

pub use shell_config::{
    ApiConfig, EngineConfig, EntitiesConfig, LoggingConfig, ShellConfig, UndoConfig,
    WidgetsConfig,
};
