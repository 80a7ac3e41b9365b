use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gui::ToolbarOptions;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    #[serde(default = "default_logo_path")]
    pub logo_path: String,
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    #[serde(default)]
    pub toolbar: ToolbarOptions,
}

fn default_logo_path() -> String {
    "assets/images/logo.png".to_string()
}

fn default_config_version() -> u32 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            logo_path: default_logo_path(),
            config_version: default_config_version(),
            toolbar: ToolbarOptions::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the config at `path`, writing defaults if it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        match toml::from_str::<Config>(&contents) {
            Ok(mut config) => {
                if config.config_version < default_config_version() {
                    config = Self::migrate_config(config);
                    config.save_to(path)?;
                }
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                log::warn!("Failed to parse config: {}. Using defaults and merging.", e);
                let config = Self::merge_recoverable(&contents);
                config.validate()?;
                config.save_to(path)?;
                Ok(config)
            }
        }
    }

    /// Pulls whatever top-level fields still parse out of a broken file.
    fn merge_recoverable(contents: &str) -> Self {
        let mut config = Self::default();

        let Ok(value) = toml::from_str::<toml::Value>(contents) else {
            return config;
        };
        let Some(table) = value.as_table() else {
            return config;
        };

        if let Some(level) = table.get("log_level").and_then(|v| v.as_str()) {
            config.log_level = level.to_string();
        }
        if let Some(logo) = table.get("logo_path").and_then(|v| v.as_str()) {
            config.logo_path = logo.to_string();
        }
        if let Some(title) = table
            .get("toolbar")
            .and_then(|t| t.get("title"))
            .and_then(|v| v.as_str())
        {
            config.toolbar.title = title.to_string();
        }

        config
    }

    fn migrate_config(mut config: Config) -> Self {
        log::info!(
            "Migrating config from v{} to v{}",
            config.config_version,
            default_config_version()
        );

        // v2 introduced the logo path; older files may carry an empty one.
        if config.config_version < 2 && config.logo_path.trim().is_empty() {
            config.logo_path = default_logo_path();
        }

        config.config_version = default_config_version();
        config
    }

    fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level: '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.logo_path.trim().is_empty() {
            return Err(Error::Config("logo_path must not be empty".to_string()));
        }

        if self.toolbar.title.trim().is_empty() {
            return Err(Error::Config("toolbar.title must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "tawfir")
            .ok_or_else(|| Error::Config("Failed to determine project directories".to_string()))
    }
}
