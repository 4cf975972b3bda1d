//! INI configuration file.
//!
//! ```ini
//! [content]
//! base_dir = /opt/game/Data
//! data_dir = /home/user/.local/share/contentlayer
//!
//! [campaign]
//! default = lugaru
//!
//! [logging]
//! level = info
//! file = true
//! ```
//!
//! Missing keys fall back to their defaults; a missing file is equivalent to
//! an empty one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::layout::ContentLayout;
use crate::paths::{AppDirs, PathError};

/// Campaign loaded when the requested one cannot be found.
pub const DEFAULT_CAMPAIGN: &str = "lugaru";

/// Base game content directory used when none is configured.
pub const DEFAULT_BASE_DIR: &str = "Data";

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Errors loading, saving or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: ini::Error },

    #[error("failed to write config {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[content]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSettings {
    /// Installed base game content. Defaults to `./Data`.
    pub base_dir: Option<PathBuf>,

    /// User data directory override. Defaults to the platform directory.
    pub data_dir: Option<PathBuf>,
}

/// `[campaign]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSettings {
    /// Campaign used as the fallback target.
    pub default_campaign: String,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            default_campaign: DEFAULT_CAMPAIGN.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level filter (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,

    /// Whether to also write a log file into the user data directory.
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: true,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub content: ContentSettings,
    pub campaign: CampaignSettings,
    pub logging: LoggingSettings,
}

/// Path of the configuration file for the default application directories.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(AppDirs::default().config_file_path()?)
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Save to an explicit path, replacing the file atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = path.with_extension("ini.tmp");
        self.to_ini().write_to_file(&temp_path).map_err(write_err)?;
        fs::rename(&temp_path, path).map_err(write_err)?;

        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Application directories, honouring the `data_dir` override.
    pub fn app_dirs(&self) -> AppDirs {
        match &self.content.data_dir {
            Some(dir) => AppDirs::default().with_data_dir(dir),
            None => AppDirs::default(),
        }
    }

    /// Installed base game directory.
    pub fn base_dir(&self) -> PathBuf {
        self.content
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR))
    }

    /// Content layout derived from this configuration.
    ///
    /// Creates the user data, `Mods/` and `TexturePacks/` directories.
    pub fn layout(&self) -> Result<ContentLayout, ConfigError> {
        Ok(ContentLayout::from_app_dirs(self.base_dir(), &self.app_dirs())?)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let get = |section: &str, key: &str| {
            ini.section(Some(section))
                .and_then(|s| s.get(key))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        config.content.base_dir = get("content", "base_dir").map(PathBuf::from);
        config.content.data_dir = get("content", "data_dir").map(PathBuf::from);
        if let Some(name) = get("campaign", "default") {
            config.campaign.default_campaign = name.to_string();
        }
        if let Some(level) = get("logging", "level") {
            config.logging.level = parse_log_level("logging.level", level)?;
        }
        if let Some(file) = get("logging", "file") {
            config.logging.file = parse_bool("logging.file", file)?;
        }
        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        {
            let mut section = ini.with_section(Some("content"));
            if let Some(dir) = &self.content.base_dir {
                section.set("base_dir", dir.display().to_string());
            }
            if let Some(dir) = &self.content.data_dir {
                section.set("data_dir", dir.display().to_string());
            }
        }
        ini.with_section(Some("campaign"))
            .set("default", self.campaign.default_campaign.as_str());
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.as_str())
            .set("file", self.logging.file.to_string());
        ini
    }
}

pub(crate) fn parse_log_level(key: &str, value: &str) -> Result<String, ConfigError> {
    let level = value.trim().to_ascii_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
        })
    }
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
