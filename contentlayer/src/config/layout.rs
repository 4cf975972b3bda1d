//! Directory layout shared by the registry and resolver.

use std::path::{Path, PathBuf};

use crate::paths::{AppDirs, PathResult};

/// Where content lives on disk.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use contentlayer::config::ContentLayout;
///
/// let layout = ContentLayout::new("/opt/game/Data", "/home/ana/.local/share/game")
///     .with_state_dir("/tmp/state");
///
/// assert_eq!(layout.mods_dir, PathBuf::from("/home/ana/.local/share/game/Mods"));
/// assert_eq!(layout.state_dir, PathBuf::from("/tmp/state"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    /// Installed, read-only base game content.
    pub base_dir: PathBuf,

    /// Directory scanned for mod packages.
    pub mods_dir: PathBuf,

    /// Directory scanned for texture packs.
    pub texture_packs_dir: PathBuf,

    /// Directory holding the persisted registry files.
    pub state_dir: PathBuf,
}

impl ContentLayout {
    /// Standard layout: `Mods/` and `TexturePacks/` under `data_dir`, with
    /// the registry files stored directly in `data_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            base_dir: base_dir.into(),
            mods_dir: data_dir.join("Mods"),
            texture_packs_dir: data_dir.join("TexturePacks"),
            state_dir: data_dir.to_path_buf(),
        }
    }

    /// Layout for the given application directories, creating them.
    pub fn from_app_dirs(base_dir: impl Into<PathBuf>, dirs: &AppDirs) -> PathResult<Self> {
        Ok(Self {
            base_dir: base_dir.into(),
            mods_dir: dirs.mods_dir()?,
            texture_packs_dir: dirs.texture_packs_dir()?,
            state_dir: dirs.user_data_dir()?,
        })
    }

    /// Set the mods directory.
    pub fn with_mods_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.mods_dir = path.into();
        self
    }

    /// Set the texture pack directory.
    pub fn with_texture_packs_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture_packs_dir = path.into();
        self
    }

    /// Set the registry state directory.
    pub fn with_state_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_dir = path.into();
        self
    }
}
