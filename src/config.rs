//! Application configuration.

use crate::consts::cli_consts::{DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_SECS};
use crate::environment::Environment;
use crate::refresh::{PageSize, ParamError, PollInterval};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(#[from] ParamError),

    #[error("invalid api_url: {0}")]
    ApiUrl(String),
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the monitoring API. `None` means the local backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Seconds between automatic refreshes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Rows per page when a view is first shown.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.poll_interval()?;
        self.page_size()?;
        self.environment()?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Result<PollInterval, ConfigError> {
        Ok(PollInterval::from_secs(self.poll_interval_secs)?)
    }

    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        Ok(PageSize::new(self.default_page_size)?)
    }

    /// Environment named by `api_url`, if set.
    pub fn environment(&self) -> Result<Option<Environment>, ConfigError> {
        self.api_url
            .as_deref()
            .map(|url| url.parse::<Environment>().map_err(ConfigError::ApiUrl))
            .transpose()
    }
}

/// `~/.queue-monitor/config.json`
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let home = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".queue-monitor").join("config.json"))
}
