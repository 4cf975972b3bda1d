//! On-disk storage of the registry.
//!
//! [`RegistryStore::load_registry`] is the single read entry point: it tries
//! the manifest first and falls back to the legacy line list. Writes always
//! use the manifest and replace the file atomically (temp file + rename), so
//! an interrupted write leaves either the old registry or the new one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::encoding::{
    decode_lines, decode_manifest, encode_manifest, PersistedRegistry, RegistryEncoding,
    LEGACY_LIST_FILE, MANIFEST_FILE,
};
use super::error::{RegistryError, RegistryResult};

/// Registry contents together with the encoding they were read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedRegistry {
    pub registry: PersistedRegistry,

    /// `None` when nothing was persisted yet.
    pub encoding: Option<RegistryEncoding>,
}

/// Reads and writes the persisted registry in one state directory.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    manifest_path: PathBuf,
    legacy_path: PathBuf,
}

impl RegistryStore {
    /// Store using `packlist.json` / `modlist.txt` in `state_dir`.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            manifest_path: state_dir.join(MANIFEST_FILE),
            legacy_path: state_dir.join(LEGACY_LIST_FILE),
        }
    }

    /// Path of the canonical manifest.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Path of the legacy line list.
    pub fn legacy_path(&self) -> &Path {
        &self.legacy_path
    }

    /// Read the persisted registry, trying the manifest then the line list.
    ///
    /// A manifest that cannot be decoded is logged and skipped, not fatal.
    /// Only I/O errors other than "file not found" are returned.
    pub fn load_registry(&self) -> RegistryResult<LoadedRegistry> {
        if let Some(text) = read_optional(&self.manifest_path)? {
            match decode_manifest(&text) {
                Ok(registry) => {
                    tracing::debug!(
                        path = %self.manifest_path.display(),
                        entries = registry.entries.len(),
                        "Loaded package manifest"
                    );
                    return Ok(LoadedRegistry {
                        registry,
                        encoding: Some(RegistryEncoding::Manifest),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.manifest_path.display(),
                        error = %e,
                        "Unreadable package manifest, trying legacy mod list"
                    );
                }
            }
        }

        if let Some(text) = read_optional(&self.legacy_path)? {
            let registry = decode_lines(&text);
            tracing::info!(
                path = %self.legacy_path.display(),
                entries = registry.entries.len(),
                "Loaded legacy mod list, will migrate to manifest on next save"
            );
            return Ok(LoadedRegistry {
                registry,
                encoding: Some(RegistryEncoding::Lines),
            });
        }

        Ok(LoadedRegistry::default())
    }

    /// Write the manifest atomically.
    pub fn save(&self, registry: &PersistedRegistry) -> RegistryResult<()> {
        let text = encode_manifest(registry)?;
        write_atomic(&self.manifest_path, text.as_bytes())?;

        tracing::info!(
            path = %self.manifest_path.display(),
            entries = registry.entries.len(),
            "Saved package manifest"
        );
        Ok(())
    }
}

fn read_optional(path: &Path) -> RegistryResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RegistryError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `contents` to a sibling temp file, sync it, then rename over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> RegistryResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| RegistryError::CreateDirFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let write_err = |source| RegistryError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let result = (|| -> io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }
    Ok(())
}
