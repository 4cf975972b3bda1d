//! Addressable configuration keys for `config get` / `config set`.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{parse_bool, parse_log_level, ConfigError, ConfigFile};

/// A single setting addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ContentBaseDir,
    ContentDataDir,
    CampaignDefault,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ContentBaseDir,
            ConfigKey::ContentDataDir,
            ConfigKey::CampaignDefault,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// Section the key belongs to.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ContentBaseDir | ConfigKey::ContentDataDir => "content",
            ConfigKey::CampaignDefault => "campaign",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ContentBaseDir => "base_dir",
            ConfigKey::ContentDataDir => "data_dir",
            ConfigKey::CampaignDefault => "default",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Fully qualified `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ContentBaseDir => display_path(&config.content.base_dir),
            ConfigKey::ContentDataDir => display_path(&config.content.data_dir),
            ConfigKey::CampaignDefault => config.campaign.default_campaign.clone(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config.logging.file.to_string(),
        }
    }

    /// Validate and store a value. An empty value clears optional paths.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::ContentBaseDir => config.content.base_dir = optional_path(value),
            ConfigKey::ContentDataDir => config.content.data_dir = optional_path(value),
            ConfigKey::CampaignDefault => {
                if value.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: self.name(),
                        value: value.to_string(),
                        reason: "campaign name cannot be empty".to_string(),
                    });
                }
                config.campaign.default_campaign = value.to_string();
            }
            ConfigKey::LoggingLevel => config.logging.level = parse_log_level(&self.name(), value)?,
            ConfigKey::LoggingFile => config.logging.file = parse_bool(&self.name(), value)?,
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}
