//! # Configuration Loader / 配置加载器
//!
//! Reads TOML files into `ShellConfig` and entity configs. Entity configs are
//! validated when the `ConfigStore` is built, not here.
//! 读取 TOML 文件；实体配置的校验在构建 `ConfigStore` 时进行。

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use ws_core::config::ShellConfig;
use ws_core::entity::EntityConfig;

/// Load the shell configuration. Missing keys take their default values.
/// 加载 shell 配置，缺失的键使用默认值。
pub fn load_shell_config(path: &Path) -> anyhow::Result<ShellConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    ShellConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config as TOML: {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct EntityConfigFile {
    #[serde(default)]
    entity: Vec<EntityConfig>,
}

/// Load `[[entity]]` tables from a TOML file.
pub fn load_entity_configs(path: &Path) -> anyhow::Result<Vec<EntityConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entity config file: {}", path.display()))?;
    let file: EntityConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse entity configs: {}", path.display()))?;
    Ok(file.entity)
}
