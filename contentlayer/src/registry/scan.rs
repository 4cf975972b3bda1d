//! Discovery of installed packages and reconciliation with the registry.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::core::Registry;
use super::error::{RegistryError, RegistryResult};
use crate::package::{load_metadata, ContentPackage, PackageKind, BASE_GAME_ID};

/// A package directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPackage {
    /// Directory name.
    pub id: String,

    /// Kind implied by the content directory it was found in.
    pub kind: PackageKind,

    /// Full path to the package directory.
    pub root: PathBuf,
}

/// Outcome of [`Registry::scan_and_reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Packages seen for the first time, in the order they were appended.
    pub discovered: Vec<String>,

    /// Persisted packages whose directory is gone.
    pub removed: Vec<String>,

    /// Packages known after the scan.
    pub total: usize,
}

impl ScanReport {
    /// Whether the scan changed the set of known packages.
    pub fn has_changes(&self) -> bool {
        !self.discovered.is_empty() || !self.removed.is_empty()
    }
}

/// List the package directories in `dir`, sorted by name.
///
/// Every non-hidden subdirectory is a package, except one named after the
/// base game id. A missing directory yields an empty list.
pub fn discover_packages(dir: &Path, kind: PackageKind) -> RegistryResult<Vec<DiscoveredPackage>> {
    if !dir.exists() {
        tracing::debug!(path = %dir.display(), "Content directory does not exist");
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(RegistryError::NotADirectory(dir.to_path_buf()));
    }

    let read_err = |source| RegistryError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut packages = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!(path = %path.display(), "Skipping package with a non UTF-8 name");
            continue;
        };

        // Skip hidden folders
        if name.starts_with('.') {
            continue;
        }

        if name == BASE_GAME_ID {
            tracing::warn!(
                path = %path.display(),
                "Skipping package that uses the reserved base game id"
            );
            continue;
        }

        packages.push(DiscoveredPackage {
            id: name,
            kind,
            root: path,
        });
    }

    packages.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(packages)
}

impl Registry {
    /// Reconcile the registry with the content directories and persist it.
    ///
    /// Known packages keep their status and relative order, with kind, root
    /// and metadata refreshed from disk. New packages take their kind's
    /// default status and are appended in id order. Packages whose directory
    /// is gone are dropped. An id present in both content directories is
    /// kept as a mod.
    ///
    /// Running it twice without filesystem changes writes identical files.
    pub fn scan_and_reconcile(&mut self) -> RegistryResult<ScanReport> {
        if self.pending.is_some() {
            return Err(RegistryError::EditInProgress);
        }

        let mut found: BTreeMap<String, DiscoveredPackage> = BTreeMap::new();
        for package in discover_packages(&self.layout().mods_dir, PackageKind::Mod)? {
            found.insert(package.id.clone(), package);
        }
        for package in discover_packages(&self.layout().texture_packs_dir, PackageKind::TexturePack)? {
            if found.contains_key(&package.id) {
                tracing::warn!(
                    package = %package.id,
                    "Package exists as both a mod and a texture pack, keeping the mod"
                );
                continue;
            }
            found.insert(package.id.clone(), package);
        }

        let mut report = ScanReport::default();

        let known: Vec<String> = self.packages().map(|p| p.id.clone()).collect();
        for id in known {
            if !found.contains_key(&id) {
                self.remove(&id);
                tracing::info!(package = %id, "Package directory removed, dropping from registry");
                report.removed.push(id);
            }
        }

        for (id, discovered) in found {
            let metadata = load_metadata(&id, &discovered.root);
            if let Some(package) = self.package_mut(&id) {
                package.kind = discovered.kind;
                package.root = discovered.root;
                package.metadata = metadata;
                continue;
            }

            let package = ContentPackage::new(id.clone(), discovered.kind, discovered.root)
                .with_metadata(metadata);
            tracing::info!(
                package = %id,
                kind = %package.kind,
                status = %package.status,
                "Discovered new package"
            );
            self.insert(package);
            report.discovered.push(id);
        }

        report.total = self.len();
        self.persist()?;

        tracing::info!(
            discovered = report.discovered.len(),
            removed = report.removed.len(),
            total = report.total,
            "Package scan complete"
        );
        Ok(report)
    }
}
