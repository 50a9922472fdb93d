//! Configuration for Tessera - using the CLI (clap), env (clap), and configuration file (toml).

mod clap_config;
mod toml_config;

use clap::{parser::ValueSource, ArgMatches, ValueEnum};
use serde::Deserialize;

pub use toml_config::TomlConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("toml config error")]
    TomlConfig(#[from] TomlConfigError),

    #[error(transparent)]
    Clap(#[from] clap::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON template to instantiate
    pub template: Option<String>,

    /// Root directory holding config/config.toml
    pub root_dir: String,

    pub log_level: LogLevel,

    pub log_format: LogFormat,

    /// User the template is instantiated as
    pub user: String,

    pub groups: Vec<String>,

    /// chrono format of dates in template configs
    pub date_format: Option<String>,

    /// Number of views listed after instantiation, 0 for all
    pub page_size: u32,
}

impl Config {
    pub fn new() -> ConfigResult<Self> {
        let clap_matches = clap_config::get_matches();
        Self::from_matches(clap_matches)
    }

    pub fn from_args<I, T>(args: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_matches(clap_config::try_get_matches_from(args)?)
    }

    fn from_matches(clap_matches: ArgMatches) -> ConfigResult<Self> {
        let mut config: Config = clap_matches.clone().into();
        config.merge_toml_core_config(clap_matches)?;

        Ok(config)
    }

    fn was_supplied_by_user(key: &str, matches: &ArgMatches) -> bool {
        !matches!(
            matches.value_source(key),
            Some(ValueSource::DefaultValue) | None
        )
    }

    /// The order of priority is (in decreasing order):
    /// cli -> env -> toml -> default
    ///
    /// Fields with a default value take the TOML value unless the user set
    /// them. Optional fields take it only when still unset.
    fn merge_toml_core_config(&mut self, matches: ArgMatches) -> ConfigResult<()> {
        let Some(toml_config) = toml_config::read_config(&self.root_dir)? else {
            return Ok(());
        };
        let core = toml_config.core;

        if self.template.is_none() {
            self.template = core.template;
        }

        if !Self::was_supplied_by_user("log-level", &matches) {
            if let Some(log_level) = core.log_level {
                self.log_level = log_level;
            }
        }

        if !Self::was_supplied_by_user("log-format", &matches) {
            if let Some(log_format) = core.log_format {
                self.log_format = log_format;
            }
        }

        if !Self::was_supplied_by_user("user", &matches) {
            if let Some(user) = core.user {
                self.user = user;
            }
        }

        if self.groups.is_empty() {
            self.groups = core.groups.unwrap_or_default();
        }

        if self.date_format.is_none() {
            self.date_format = core.date_format;
        }

        if !Self::was_supplied_by_user("page-size", &matches) {
            if let Some(page_size) = core.page_size {
                self.page_size = page_size;
            }
        }

        Ok(())
    }
}

// `clap` does not provide an automated way to fill `Config` in builder mode.
// Every unwrapped argument carries a default value.
#[allow(clippy::unwrap_used)]
impl From<ArgMatches> for Config {
    fn from(am: ArgMatches) -> Self {
        Config {
            template: am.get_one::<String>("template").cloned(),
            root_dir: am.get_one::<String>("root-dir").unwrap().clone(),
            log_level: *am.get_one::<LogLevel>("log-level").unwrap(),
            log_format: *am.get_one::<LogFormat>("log-format").unwrap(),
            user: am.get_one::<String>("user").unwrap().clone(),
            groups: am
                .get_many::<String>("groups")
                .map(|values| {
                    values
                        .filter(|group| !group.is_empty())
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
            date_format: am.get_one::<String>("date-format").cloned(),
            page_size: *am.get_one::<u32>("page-size").unwrap(),
        }
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize, ValueEnum)]
#[clap(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    #[serde(rename = "DEBUG")]
    Debug,
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "ERROR")]
    Error,
}

impl LogLevel {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Deserialize)]
#[clap(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogFormat {
    #[serde(rename = "PRETTY")]
    Pretty,
    #[serde(rename = "JSON")]
    Json,
}
