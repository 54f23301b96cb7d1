//! # Configuration Resolution / 配置解析
//!
//! Finds the shell configuration file and turns it, together with the entity
//! configs it points at, into the values the runtime is wired from.
//! 查找配置文件，并加载其指向的实体配置。
//!
//! File parsing itself lives in `ws_infra::config`; this module only decides
//! which files to read and what to fall back to.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ws_core::config::ShellConfig;
use ws_core::entity::ConfigStore;
use ws_infra::config::{load_entity_configs, load_shell_config};

const APP_DIR_NAME: &str = "widget-shell";
const CONFIG_FILE_NAME: &str = "shell.toml";
const CONFIG_ENV: &str = "WIDGET_SHELL_CONFIG";

/// Default location of the shell config: `<config dir>/widget-shell/shell.toml`.
/// 默认配置路径。
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Pick the config file to read.
///
/// An explicit path wins, then `WIDGET_SHELL_CONFIG`, then the default
/// location if a file exists there. `None` means built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    default_config_path().filter(|path| path.is_file())
}

/// Load the shell config, or defaults when there is no file to read.
///
/// A path that was chosen but cannot be read or parsed is an error; the
/// shell does not silently fall back in that case.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ShellConfig> {
    match path {
        Some(path) => load_shell_config(path),
        None => Ok(ShellConfig::default()),
    }
}

/// Build the entity config store.
///
/// Uses `[entities] config_path` when set, resolved relative to the shell
/// config file; otherwise the built-in contacts/leads/companies/deals/sales/
/// tickets/tasks configs. Every config is validated.
pub fn load_config_store(
    config: &ShellConfig,
    config_file: Option<&Path>,
) -> anyhow::Result<ConfigStore> {
    let configs = match config.entities.config_path.as_deref() {
        Some(path) => {
            let path = relative_to(config_file, path);
            let configs = load_entity_configs(&path)?;
            tracing::info!(path = %path.display(), count = configs.len(), "entity configs loaded");
            configs
        }
        None => ws_core::entity::defaults::builtin_configs(),
    };
    ConfigStore::from_configs(configs).context("Invalid entity configuration")
}

fn relative_to(config_file: Option<&Path>, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_file.and_then(Path::parent) {
        Some(base) => base.join(path),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/custom.toml");
        assert_eq!(resolve_config_path(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_builtin_store_without_entities_path() {
        let store = load_config_store(&ShellConfig::default(), None).unwrap();
        for entity_type in ["contacts", "leads", "companies", "deals", "sales", "tickets", "tasks"] {
            assert!(store.get(entity_type).is_some(), "missing {entity_type}");
        }
    }

    #[test]
    fn test_entities_path_is_relative_to_config_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "entities.toml",
            r#"
            [[entity]]
            entity_type = "vendors"
            title = "Vendors"
            api_endpoint = "vendors"
            data_key = "vendors"
        "#,
        );
        let shell = write(&dir, "shell.toml", "[entities]\nconfig_path = \"entities.toml\"\n");

        let config = load_config(Some(&shell)).unwrap();
        let store = load_config_store(&config, Some(&shell)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("vendors").is_some());
    }

    #[test]
    fn test_invalid_entity_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let entities = write(
            &dir,
            "entities.toml",
            r#"
            [[entity]]
            entity_type = "vendors"
            title = "Vendors"
            api_endpoint = ""
            data_key = "vendors"
        "#,
        );
        let mut config = ShellConfig::default();
        config.entities.config_path = Some(entities);

        let err = load_config_store(&config, None).unwrap_err();
        assert!(err.to_string().contains("Invalid entity configuration"));
    }
}
