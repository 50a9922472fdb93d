//! File-based (TOML) configuration, read from `<root-dir>/config/config.toml`.

use crate::util;
use std::fs;

use super::{ConfigResult, Deserialize, LogFormat, LogLevel};

#[derive(Debug, thiserror::Error)]
pub enum TomlConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TomlConfig {
    #[serde(default)]
    pub core: CoreConfig,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CoreConfig {
    pub template: Option<String>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub user: Option<String>,
    pub groups: Option<Vec<String>>,
    pub date_format: Option<String>,
    pub page_size: Option<u32>,
}

pub(super) fn read_config(root_dir: &str) -> ConfigResult<Option<TomlConfig>> {
    let Some(config_file) = util::get_toml_config_file(root_dir, "config") else {
        return Ok(None);
    };

    if !config_file.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(config_file).map_err(TomlConfigError::from)?;
    Ok(Some(
        toml::from_str::<TomlConfig>(&contents).map_err(TomlConfigError::from)?,
    ))
}
