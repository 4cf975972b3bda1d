//! Error types for the package registry.

use std::io;
use std::path::PathBuf;

use crate::paths::PathError;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while loading, scanning or persisting the registry.
///
/// Malformed descriptors and manifest entries are not errors: they are logged
/// and degraded where they occur. What remains here is what the caller must
/// hear about, above all failures to persist the user's edits.
#[derive(Debug)]
pub enum RegistryError {
    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write the persisted registry.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to encode the registry for writing.
    EncodeFailed(String),

    /// A directory that must be a directory is something else.
    NotADirectory(PathBuf),

    /// A rescan was requested while an edit session is open.
    EditInProgress,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::EncodeFailed(msg) => write!(f, "failed to encode registry: {}", msg),
            Self::NotADirectory(path) => {
                write!(f, "{} exists but is not a directory", path.display())
            }
            Self::EditInProgress => {
                write!(f, "cannot rescan packages while an edit is in progress")
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PathError> for RegistryError {
    fn from(e: PathError) -> Self {
        match e {
            PathError::CreateDir { path, source } => Self::CreateDirFailed { path, source },
            PathError::NotADirectory(path) => Self::NotADirectory(path),
        }
    }
}
