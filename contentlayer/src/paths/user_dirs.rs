//! User directory resolution.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application name used for user directories when none is configured.
pub const DEFAULT_APP_NAME: &str = "contentlayer";

/// Name of the mods directory beneath the user data directory.
const MODS_DIR: &str = "Mods";

/// Name of the texture pack directory beneath the user data directory.
const TEXTURE_PACKS_DIR: &str = "TexturePacks";

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;

/// Errors raised while preparing user directories.
#[derive(Debug, Error)]
pub enum PathError {
    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// A path exists but is not a directory.
    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Create `path` (and its parents) if it does not exist yet.
///
/// Fails when `path` exists but is not a directory.
pub fn ensure_dir(path: &Path) -> PathResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(|source| PathError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Created directory");
    Ok(())
}

/// Platform-specific user directories for one application.
///
/// | Platform | Data directory |
/// |----------|----------------|
/// | Linux    | `$XDG_DATA_HOME/<app>` or `~/.local/share/<app>` |
/// | macOS    | `~/Library/Application Support/<App>` |
/// | Windows  | `%APPDATA%\<App>` |
///
/// Every accessor that returns a directory creates it first.
///
/// # Example
///
/// ```
/// use contentlayer::paths::AppDirs;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let dirs = AppDirs::new("mygame").with_data_dir(temp.path().join("data"));
///
/// let mods = dirs.mods_dir().unwrap();
/// assert!(mods.is_dir());
/// assert!(mods.ends_with("Mods"));
/// ```
#[derive(Debug, Clone)]
pub struct AppDirs {
    app_name: String,
    data_dir_override: Option<PathBuf>,
    config_dir_override: Option<PathBuf>,
}

impl Default for AppDirs {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

impl AppDirs {
    /// Create directory resolution for the named application.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            data_dir_override: None,
            config_dir_override: None,
        }
    }

    /// Use an explicit user data directory instead of the platform default.
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir_override = Some(path.into());
        self
    }

    /// Use an explicit configuration directory instead of the platform default.
    pub fn with_config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_dir_override = Some(path.into());
        self
    }

    /// Application name these directories belong to.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Location of the user data directory, without touching the filesystem.
    pub fn user_data_path(&self) -> PathBuf {
        if let Some(path) = &self.data_dir_override {
            return path.clone();
        }
        match dirs::data_dir() {
            Some(base) => base.join(self.folder_name()),
            None => PathBuf::from("."),
        }
    }

    /// Writable directory for persistent user state, created if absent.
    pub fn user_data_dir(&self) -> PathResult<PathBuf> {
        let path = self.user_data_path();
        ensure_dir(&path)?;
        Ok(path)
    }

    /// Directory holding the configuration file, created if absent.
    ///
    /// Linux keeps configuration separate (`$XDG_CONFIG_HOME/<app>`); other
    /// platforms store it alongside the user data.
    pub fn config_dir(&self) -> PathResult<PathBuf> {
        let path = match &self.config_dir_override {
            Some(path) => path.clone(),
            None => self.platform_config_dir(),
        };
        ensure_dir(&path)?;
        Ok(path)
    }

    /// Full path of the INI configuration file.
    pub fn config_file_path(&self) -> PathResult<PathBuf> {
        Ok(self.config_dir()?.join("config.ini"))
    }

    /// Directory that receives screenshots.
    pub fn screenshot_dir(&self) -> PathResult<PathBuf> {
        self.subdir("Screenshots")
    }

    /// Directory that receives player profiles and progress.
    pub fn user_save_dir(&self) -> PathResult<PathBuf> {
        self.subdir("users")
    }

    /// Directory scanned for mod packages.
    pub fn mods_dir(&self) -> PathResult<PathBuf> {
        self.subdir(MODS_DIR)
    }

    /// Directory scanned for texture packs.
    pub fn texture_packs_dir(&self) -> PathResult<PathBuf> {
        self.subdir(TEXTURE_PACKS_DIR)
    }

    fn subdir(&self, name: &str) -> PathResult<PathBuf> {
        let path = self.user_data_dir()?.join(name);
        ensure_dir(&path)?;
        Ok(path)
    }

    #[cfg(target_os = "linux")]
    fn folder_name(&self) -> String {
        self.app_name.to_lowercase()
    }

    #[cfg(not(target_os = "linux"))]
    fn folder_name(&self) -> String {
        self.app_name.clone()
    }

    #[cfg(target_os = "linux")]
    fn platform_config_dir(&self) -> PathBuf {
        match dirs::config_dir() {
            Some(base) => base.join(self.folder_name()),
            None => PathBuf::from("."),
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn platform_config_dir(&self) -> PathBuf {
        self.user_data_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_user_data_dir_created_on_demand() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("data");
        let dirs = AppDirs::new("game").with_data_dir(&target);

        assert!(!target.exists());
        let path = dirs.user_data_dir().unwrap();
        assert_eq!(path, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_subdirectories_live_under_data_dir() {
        let temp = TempDir::new().unwrap();
        let dirs = AppDirs::new("game").with_data_dir(temp.path());

        assert_eq!(dirs.mods_dir().unwrap(), temp.path().join("Mods"));
        assert_eq!(
            dirs.texture_packs_dir().unwrap(),
            temp.path().join("TexturePacks")
        );
        assert_eq!(
            dirs.screenshot_dir().unwrap(),
            temp.path().join("Screenshots")
        );
        assert_eq!(dirs.user_save_dir().unwrap(), temp.path().join("users"));
    }

    #[test]
    fn test_config_dir_override() {
        let temp = TempDir::new().unwrap();
        let dirs = AppDirs::new("game").with_config_dir(temp.path().join("cfg"));

        let path = dirs.config_file_path().unwrap();
        assert_eq!(path, temp.path().join("cfg").join("config.ini"));
        assert!(temp.path().join("cfg").is_dir());
    }

    #[test]
    fn test_creation_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let dirs = AppDirs::new("game").with_data_dir(&blocker);
        let err = dirs.user_data_dir().unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));

        let nested = AppDirs::new("game").with_data_dir(blocker.join("inner"));
        let err = nested.user_data_dir().unwrap_err();
        assert!(matches!(err, PathError::CreateDir { .. }));
        assert!(err.to_string().contains("failed to create directory"));
    }

    #[test]
    fn test_default_app_name() {
        assert_eq!(AppDirs::default().app_name(), DEFAULT_APP_NAME);
    }
}
