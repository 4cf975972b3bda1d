//! Configuration file and content directory layout.
//!
//! - [`ConfigFile`]: the user's `config.ini`, loaded with defaults for every
//!   missing key
//! - [`ConfigKey`]: `section.key` addressing used by `config get/set`
//! - [`ContentLayout`]: resolved directories for the base game, mods,
//!   texture packs and registry state

mod file;
mod keys;
mod layout;

pub use file::{
    config_file_path, CampaignSettings, ConfigError, ConfigFile, ContentSettings,
    LoggingSettings, DEFAULT_BASE_DIR, DEFAULT_CAMPAIGN, DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;
pub use layout::ContentLayout;
