//! The in-memory registry of content packages.

use std::collections::HashMap;
use std::path::PathBuf;

use super::edit::PendingEdit;
use super::encoding::{PersistedEntry, PersistedRegistry, RegistryEncoding};
use super::error::RegistryResult;
use super::store::RegistryStore;
use crate::config::ContentLayout;
use crate::package::{
    load_metadata, ContentPackage, PackageKind, PackageMetadata, PackageStatus, BASE_GAME_ID,
    DESCRIPTOR_FILE,
};

/// Every known content package, partitioned into enabled and available.
///
/// The enabled list is in priority order: the first entry is searched first
/// and newly enabled packages are appended. Each package id appears in
/// exactly one of the two lists. The base game is held apart and is never
/// part of either list.
///
/// Status changes go through the edit API ([`Registry::begin_edit`],
/// [`Registry::move_package`], [`Registry::apply`], [`Registry::discard`]).
#[derive(Debug)]
pub struct Registry {
    layout: ContentLayout,
    store: RegistryStore,
    base: ContentPackage,
    packages: HashMap<String, ContentPackage>,
    pub(super) enabled: Vec<String>,
    pub(super) available: Vec<String>,
    pub(super) pending: Option<PendingEdit>,
    loaded_from: Option<RegistryEncoding>,
}

impl Registry {
    /// Empty registry over the given layout. Nothing is read from disk.
    pub fn new(layout: ContentLayout) -> Self {
        let store = RegistryStore::new(&layout.state_dir);
        let base = ContentPackage::base_game(layout.base_dir.clone());
        Self {
            layout,
            store,
            base,
            packages: HashMap::new(),
            enabled: Vec::new(),
            available: Vec::new(),
            pending: None,
            loaded_from: None,
        }
    }

    /// Registry restored from the persisted state, without scanning.
    ///
    /// Entries of the legacy line list carry no kind; it is inferred from
    /// which content directory holds the package.
    pub fn load(layout: ContentLayout) -> RegistryResult<Self> {
        let mut registry = Self::new(layout);
        let loaded = registry.store.load_registry()?;

        for entry in loaded.registry.entries {
            registry.insert_persisted(entry);
        }
        registry.loaded_from = loaded.encoding;

        tracing::info!(
            enabled = registry.enabled.len(),
            available = registry.available.len(),
            "Package registry loaded"
        );
        Ok(registry)
    }

    /// Load the persisted state, then reconcile it with the disk.
    pub fn open(layout: ContentLayout) -> RegistryResult<Self> {
        let mut registry = Self::load(layout)?;
        registry.scan_and_reconcile()?;
        Ok(registry)
    }

    fn insert_persisted(&mut self, entry: PersistedEntry) {
        if entry.id == BASE_GAME_ID || entry.kind == Some(PackageKind::BaseGame) {
            tracing::warn!(package = %entry.id, "Ignoring base game entry in registry");
            return;
        }
        if self.packages.contains_key(&entry.id) {
            return;
        }

        let kind = entry.kind.unwrap_or_else(|| self.infer_kind(&entry.id));
        let root = self.package_root(kind, &entry.id);

        let metadata = if root.join(DESCRIPTOR_FILE).is_file() {
            load_metadata(&entry.id, &root)
        } else {
            let mut metadata = PackageMetadata::for_id(&entry.id);
            if let Some(description) = entry.description {
                metadata.description = description;
            }
            if let Some(version) = entry.version {
                metadata.version = version;
            }
            if let Some(author) = entry.author {
                metadata.author = author;
            }
            metadata
        };

        let package = ContentPackage::new(entry.id.clone(), kind, root)
            .with_status(entry.status)
            .with_metadata(metadata);
        self.insert(package);
    }

    /// Kind of a package known only by id: a texture pack when only the
    /// texture pack directory holds it, otherwise a mod.
    fn infer_kind(&self, id: &str) -> PackageKind {
        let in_packs = self.layout.texture_packs_dir.join(id).is_dir();
        let in_mods = self.layout.mods_dir.join(id).is_dir();
        if in_packs && !in_mods {
            PackageKind::TexturePack
        } else {
            PackageKind::Mod
        }
    }

    pub(super) fn package_root(&self, kind: PackageKind, id: &str) -> PathBuf {
        match kind {
            PackageKind::TexturePack => self.layout.texture_packs_dir.join(id),
            PackageKind::Mod => self.layout.mods_dir.join(id),
            PackageKind::BaseGame => self.layout.base_dir.clone(),
        }
    }

    /// Add a package at the end of the list matching its status.
    pub(super) fn insert(&mut self, package: ContentPackage) {
        let id = package.id.clone();
        match package.status {
            PackageStatus::Enabled => self.enabled.push(id.clone()),
            PackageStatus::Available => self.available.push(id.clone()),
        }
        self.packages.insert(id, package);
    }

    /// Drop a package from the map and both lists.
    pub(super) fn remove(&mut self, id: &str) -> Option<ContentPackage> {
        self.enabled.retain(|e| e != id);
        self.available.retain(|a| a != id);
        self.packages.remove(id)
    }

    pub(super) fn package_mut(&mut self, id: &str) -> Option<&mut ContentPackage> {
        self.packages.get_mut(id)
    }

    /// Directory layout this registry was built over.
    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Persistent storage backing this registry.
    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Encoding the registry was loaded from, if any state existed.
    pub fn loaded_from(&self) -> Option<RegistryEncoding> {
        self.loaded_from
    }

    /// The base game, always enabled.
    pub fn base_game(&self) -> &ContentPackage {
        &self.base
    }

    /// Look up a package by id. The base game is not returned.
    pub fn get(&self, id: &str) -> Option<&ContentPackage> {
        self.packages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.packages.contains_key(id)
    }

    /// Total number of packages, excluding the base game.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All packages: enabled in priority order, then available.
    pub fn packages(&self) -> impl Iterator<Item = &ContentPackage> {
        self.enabled
            .iter()
            .chain(self.available.iter())
            .filter_map(|id| self.packages.get(id))
    }

    /// Committed enabled ids in priority order.
    pub fn enabled_ids(&self) -> &[String] {
        &self.enabled
    }

    /// Committed available ids.
    pub fn available_ids(&self) -> &[String] {
        &self.available
    }

    /// Enabled packages of every kind, in priority order.
    pub fn enabled_packages(&self) -> impl Iterator<Item = &ContentPackage> {
        self.enabled.iter().filter_map(|id| self.packages.get(id))
    }

    /// Enabled mods in priority order.
    pub fn enabled_mods(&self) -> Vec<&ContentPackage> {
        self.enabled_of_kind(PackageKind::Mod)
    }

    /// Enabled texture packs in priority order.
    pub fn enabled_texture_packs(&self) -> Vec<&ContentPackage> {
        self.enabled_of_kind(PackageKind::TexturePack)
    }

    /// `(id, metadata)` for each enabled mod, in priority order.
    pub fn enabled_with_metadata(&self) -> Vec<(&str, &PackageMetadata)> {
        self.enabled_of_kind(PackageKind::Mod)
            .into_iter()
            .map(|package| (package.id.as_str(), &package.metadata))
            .collect()
    }

    /// Number of enabled packages of every kind.
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    fn enabled_of_kind(&self, kind: PackageKind) -> Vec<&ContentPackage> {
        self.enabled_packages()
            .filter(|package| package.kind == kind)
            .collect()
    }

    /// Committed state in its persisted form.
    pub fn to_persisted(&self) -> PersistedRegistry {
        self.persisted_view(&self.enabled, &self.available)
    }

    /// Persisted form of the given partition; enabled ids first.
    pub(super) fn persisted_view(&self, enabled: &[String], available: &[String]) -> PersistedRegistry {
        let entries = enabled
            .iter()
            .map(|id| (id, PackageStatus::Enabled))
            .chain(available.iter().map(|id| (id, PackageStatus::Available)))
            .filter_map(|(id, status)| {
                let package = self.packages.get(id)?;
                Some(PersistedEntry {
                    id: package.id.clone(),
                    kind: Some(package.kind),
                    status,
                    description: Some(package.metadata.description.clone()),
                    version: Some(package.metadata.version.clone()),
                    author: Some(package.metadata.author.clone()),
                })
            })
            .collect();
        PersistedRegistry { entries }
    }

    /// Write the committed state.
    pub(crate) fn persist(&self) -> RegistryResult<()> {
        self.store.save(&self.to_persisted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn layout(temp: &TempDir) -> ContentLayout {
        ContentLayout::new(temp.path().join("Data"), temp.path().join("user"))
    }

    #[test]
    fn test_new_registry_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::new(layout(&temp));

        assert!(registry.is_empty());
        assert_eq!(registry.enabled_count(), 0);
        assert!(registry.base_game().is_enabled());
        assert!(registry.get(BASE_GAME_ID).is_none());
        assert!(registry.loaded_from().is_none());
    }

    #[test]
    fn test_load_from_legacy_list_infers_kind() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        fs::create_dir_all(layout.mods_dir.join("NightPatrol")).unwrap();
        fs::create_dir_all(layout.texture_packs_dir.join("ForestPack")).unwrap();
        fs::create_dir_all(&layout.state_dir).unwrap();
        fs::write(
            layout.state_dir.join("modlist.txt"),
            "NightPatrol: 1\nForestPack: 0\n",
        )
        .unwrap();

        let registry = Registry::load(layout).unwrap();

        assert_eq!(registry.loaded_from(), Some(RegistryEncoding::Lines));
        assert_eq!(registry.enabled_ids(), ["NightPatrol"]);
        assert_eq!(registry.available_ids(), ["ForestPack"]);
        assert_eq!(
            registry.get("ForestPack").unwrap().kind,
            PackageKind::TexturePack
        );
        assert_eq!(registry.get("NightPatrol").unwrap().kind, PackageKind::Mod);
    }

    #[test]
    fn test_manifest_metadata_used_without_descriptor() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let mut registry = Registry::new(layout.clone());
        registry.insert_persisted(PersistedEntry {
            id: "Arena".to_string(),
            kind: Some(PackageKind::Mod),
            status: PackageStatus::Enabled,
            description: Some("Fight in the pit.".to_string()),
            version: Some("3.0".to_string()),
            author: None,
        });

        let arena = registry.get("Arena").unwrap();
        assert_eq!(arena.metadata.name, "Arena");
        assert_eq!(arena.metadata.description, "Fight in the pit.");
        assert_eq!(arena.metadata.version, "3.0");
        assert_eq!(arena.metadata.author, "Unknown");
        assert_eq!(arena.root(), layout.mods_dir.join("Arena"));
    }

    #[test]
    fn test_descriptor_overrides_manifest_metadata() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let root = layout.mods_dir.join("Arena");
        fs::create_dir_all(&root).unwrap();
        fs::write(
            root.join(DESCRIPTOR_FILE),
            r#"{"Name": "The Arena", "Version": "4.0"}"#,
        )
        .unwrap();

        let mut registry = Registry::new(layout);
        registry.insert_persisted(
            PersistedEntry::new("Arena", PackageStatus::Available).with_kind(PackageKind::Mod),
        );

        let arena = registry.get("Arena").unwrap();
        assert_eq!(arena.metadata.name, "The Arena");
        assert_eq!(arena.metadata.version, "4.0");
    }

    #[test]
    fn test_base_game_entries_ignored() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::new(layout(&temp));
        registry.insert_persisted(PersistedEntry::new(BASE_GAME_ID, PackageStatus::Available));

        assert!(registry.is_empty());
    }

    #[test]
    fn test_enabled_queries() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let mut registry = Registry::new(layout.clone());
        for (id, kind, status) in [
            ("B", PackageKind::Mod, PackageStatus::Enabled),
            ("Forest", PackageKind::TexturePack, PackageStatus::Enabled),
            ("A", PackageKind::Mod, PackageStatus::Enabled),
            ("C", PackageKind::Mod, PackageStatus::Available),
        ] {
            let root = registry.package_root(kind, id);
            registry.insert(ContentPackage::new(id, kind, root).with_status(status));
        }

        let mods: Vec<&str> = registry.enabled_mods().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(mods, ["B", "A"]);
        let packs: Vec<&str> = registry
            .enabled_texture_packs()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(packs, ["Forest"]);
        assert_eq!(registry.enabled_count(), 3);

        let with_metadata = registry.enabled_with_metadata();
        assert_eq!(with_metadata.len(), 2);
        assert_eq!(with_metadata[0].0, "B");
        assert_eq!(with_metadata[0].1.description, "No description available.");

        let all: Vec<&str> = registry.packages().map(|p| p.id.as_str()).collect();
        assert_eq!(all, ["B", "Forest", "A", "C"]);
    }

    #[test]
    fn test_persisted_view_orders_enabled_first() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::new(layout(&temp));
        for (id, status) in [
            ("Z", PackageStatus::Available),
            ("Y", PackageStatus::Enabled),
        ] {
            let root = registry.package_root(PackageKind::Mod, id);
            registry.insert(ContentPackage::new(id, PackageKind::Mod, root).with_status(status));
        }

        let persisted = registry.to_persisted();
        let ids: Vec<&str> = persisted.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["Y", "Z"]);
        assert_eq!(persisted.entries[1].status, PackageStatus::Available);
    }

    #[test]
    fn test_remove_clears_both_lists() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::new(layout(&temp));
        let root = registry.package_root(PackageKind::Mod, "A");
        registry.insert(
            ContentPackage::new("A", PackageKind::Mod, root).with_status(PackageStatus::Enabled),
        );

        assert!(registry.remove("A").is_some());
        assert!(registry.enabled_ids().is_empty());
        assert!(!registry.contains("A"));
    }
}
