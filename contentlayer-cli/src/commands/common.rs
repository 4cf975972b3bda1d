//! Shared setup for CLI commands.

use std::path::PathBuf;

use contentlayer::config::{ConfigFile, ContentLayout};
use contentlayer::registry::Registry;

use crate::error::CliError;

/// Directory overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct DirOverrides {
    pub base_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Configuration and layout resolved for one command.
#[derive(Debug)]
pub struct CommandContext {
    pub config: ConfigFile,
    pub layout: ContentLayout,
}

impl CommandContext {
    /// Load the configuration, then apply command-line overrides.
    ///
    /// CLI flags take precedence over `config.ini`.
    pub fn load(overrides: &DirOverrides) -> Result<Self, CliError> {
        let mut config = load_config();
        if let Some(dir) = &overrides.base_dir {
            config.content.base_dir = Some(dir.clone());
        }
        if let Some(dir) = &overrides.data_dir {
            config.content.data_dir = Some(dir.clone());
        }

        let layout = config.layout()?;
        tracing::debug!(
            base = %layout.base_dir.display(),
            mods = %layout.mods_dir.display(),
            texture_packs = %layout.texture_packs_dir.display(),
            "Content layout"
        );
        Ok(Self { config, layout })
    }

    /// Registry loaded from disk and reconciled with the content directories.
    pub fn open_registry(&self) -> Result<Registry, CliError> {
        Ok(Registry::open(self.layout.clone())?)
    }
}

/// Load config or return default, logging why the file was ignored.
pub fn load_config() -> ConfigFile {
    ConfigFile::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable configuration, using defaults");
        ConfigFile::default()
    })
}
