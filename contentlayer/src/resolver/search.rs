//! Layered lookup over the registry's enabled packages.

use super::resolved::{Resolution, ResolutionLayer, ResolvedPath};
use crate::package::ContentPackage;
use crate::paths::{find_relative, normalize_relative};
use crate::registry::Registry;

/// File name of a package's icon, relative to its root.
pub const PACK_ICON_FILE: &str = "pack.png";

/// Resolves logical content paths against a registry.
///
/// Search order, first existing file wins:
///
/// 1. enabled texture packs, in priority order
/// 2. when the first path segment is a known package id, that package alone
///    (a miss there is final)
/// 3. enabled mods, in priority order
/// 4. the base game
///
/// Every segment is matched case-insensitively. Nothing is cached, so a
/// committed registry change is visible on the next call.
#[derive(Debug, Clone, Copy)]
pub struct ContentResolver<'a> {
    registry: &'a Registry,
}

impl<'a> ContentResolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Resolve `relative_path` to an existing file.
    pub fn resolve(&self, relative_path: &str) -> ResolvedPath {
        self.locate(relative_path)
            .map(|resolution| resolution.path)
            .into()
    }

    /// Resolve `relative_path`, reporting which package served it.
    pub fn locate(&self, relative_path: &str) -> Option<Resolution> {
        let Some(normalized) = normalize_relative(relative_path) else {
            tracing::debug!(path = relative_path, "Rejected content path");
            return None;
        };

        let found = self.search(&normalized);
        if found.is_none() {
            tracing::debug!(path = %normalized, "Content not found");
        }
        found
    }

    fn search(&self, normalized: &str) -> Option<Resolution> {
        for pack in self.registry.enabled_texture_packs() {
            if let Some(found) = lookup(pack, normalized, ResolutionLayer::TexturePack) {
                return Some(found);
            }
        }

        if let Some((first, rest)) = normalized.split_once('/') {
            if let Some(package) = self.registry.get(first) {
                return lookup(package, rest, ResolutionLayer::Qualified);
            }
        }

        for package in self.registry.enabled_mods() {
            if let Some(found) = lookup(package, normalized, ResolutionLayer::Mod) {
                return Some(found);
            }
        }

        lookup(self.registry.base_game(), normalized, ResolutionLayer::BaseGame)
    }

    /// Icon of the package `id`, looked up in that package only.
    pub fn pack_icon(&self, id: &str) -> ResolvedPath {
        self.registry
            .get(id)
            .and_then(|package| find_relative(package.root(), PACK_ICON_FILE))
            .into()
    }
}

fn lookup(package: &ContentPackage, relative: &str, layer: ResolutionLayer) -> Option<Resolution> {
    let path = find_relative(package.root(), relative)?;
    tracing::trace!(package = %package.id, path = %path.display(), %layer, "Resolved content");
    Some(Resolution {
        path,
        package_id: package.id.clone(),
        layer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentLayout;
    use crate::registry::PendingSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    struct Fixture {
        _temp: TempDir,
        layout: ContentLayout,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let layout = ContentLayout::new(temp.path().join("Data"), temp.path().join("user"));
        fs::create_dir_all(&layout.base_dir).unwrap();
        fs::create_dir_all(&layout.mods_dir).unwrap();
        fs::create_dir_all(&layout.texture_packs_dir).unwrap();
        Fixture {
            _temp: temp,
            layout,
        }
    }

    fn enable(registry: &mut Registry, ids: &[&str]) {
        registry.begin_edit();
        for id in ids {
            registry.move_package(id, PendingSet::Available, PendingSet::Enabled);
        }
        registry.apply(&|| {}).unwrap();
    }

    #[test]
    fn test_base_game_fallback() {
        let fx = fixture();
        touch(&fx.layout.base_dir.join("Sounds/alarm.ogg"), "base");
        let registry = Registry::open(fx.layout.clone()).unwrap();
        let resolver = ContentResolver::new(&registry);

        assert_eq!(
            resolver.resolve("Sounds//alarm.ogg"),
            ResolvedPath::Found(fx.layout.base_dir.join("Sounds/alarm.ogg"))
        );
        assert_eq!(resolver.resolve("Sounds/missing.ogg"), ResolvedPath::NotFound);
        assert_eq!(resolver.resolve("../escape"), ResolvedPath::NotFound);
    }

    #[test]
    fn test_enabled_mod_overrides_base() {
        let fx = fixture();
        touch(&fx.layout.base_dir.join("Sounds/alarm.ogg"), "base");
        touch(&fx.layout.mods_dir.join("NightPatrol/Sounds/alarm.ogg"), "mod");
        let mut registry = Registry::open(fx.layout.clone()).unwrap();

        // Mods start out available.
        let base_path = fx.layout.base_dir.join("Sounds/alarm.ogg");
        assert_eq!(
            ContentResolver::new(&registry).resolve("Sounds/alarm.ogg"),
            ResolvedPath::Found(base_path)
        );

        enable(&mut registry, &["NightPatrol"]);
        let resolution = ContentResolver::new(&registry)
            .locate("Sounds/alarm.ogg")
            .unwrap();
        assert_eq!(
            resolution.path,
            fx.layout.mods_dir.join("NightPatrol/Sounds/alarm.ogg")
        );
        assert_eq!(resolution.package_id, "NightPatrol");
        assert_eq!(resolution.layer, ResolutionLayer::Mod);
    }

    #[test]
    fn test_first_enabled_mod_wins() {
        let fx = fixture();
        touch(&fx.layout.mods_dir.join("A/Textures/Fur.png"), "a");
        touch(&fx.layout.mods_dir.join("B/Textures/Fur.png"), "b");
        let mut registry = Registry::open(fx.layout.clone()).unwrap();
        enable(&mut registry, &["A", "B"]);

        let found = ContentResolver::new(&registry).resolve("Textures/Fur.png");
        assert_eq!(
            found.path(),
            Some(fx.layout.mods_dir.join("A/Textures/Fur.png").as_path())
        );
    }

    #[test]
    fn test_texture_pack_beats_mod() {
        let fx = fixture();
        touch(&fx.layout.mods_dir.join("A/Textures/Fur.png"), "mod");
        touch(&fx.layout.texture_packs_dir.join("HiRes/Textures/Fur.png"), "pack");
        let mut registry = Registry::open(fx.layout.clone()).unwrap();
        enable(&mut registry, &["A"]);

        let resolution = ContentResolver::new(&registry)
            .locate("Textures/Fur.png")
            .unwrap();
        assert_eq!(resolution.package_id, "HiRes");
        assert_eq!(resolution.layer, ResolutionLayer::TexturePack);
    }

    #[test]
    fn test_qualified_path_is_isolated() {
        let fx = fixture();
        touch(&fx.layout.base_dir.join("Maps/arena.map"), "base");
        touch(&fx.layout.mods_dir.join("NightPatrol/Maps/patrol.map"), "mod");
        let registry = Registry::open(fx.layout.clone()).unwrap();
        let resolver = ContentResolver::new(&registry);

        // Available packages can still be addressed directly.
        assert_eq!(
            resolver.resolve("NightPatrol/Maps/patrol.map"),
            ResolvedPath::Found(fx.layout.mods_dir.join("NightPatrol/Maps/patrol.map"))
        );
        // A miss inside the named package does not fall through to the base game.
        assert_eq!(
            resolver.resolve("NightPatrol/Maps/arena.map"),
            ResolvedPath::NotFound
        );
    }

    #[test]
    fn test_case_insensitive_segments() {
        let fx = fixture();
        touch(&fx.layout.base_dir.join("Textures/world.PNG"), "base");
        let registry = Registry::open(fx.layout.clone()).unwrap();

        let found = ContentResolver::new(&registry).resolve("textures\\World.png");
        assert_eq!(
            found,
            ResolvedPath::Found(fx.layout.base_dir.join("Textures/world.PNG"))
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let fx = fixture();
        touch(&fx.layout.mods_dir.join("A/Sounds/hit.ogg"), "a");
        touch(&fx.layout.mods_dir.join("B/Sounds/hit.ogg"), "b");
        touch(&fx.layout.base_dir.join("Sounds/hit.ogg"), "base");
        let mut registry = Registry::open(fx.layout.clone()).unwrap();
        enable(&mut registry, &["B", "A"]);
        let resolver = ContentResolver::new(&registry);

        let first = resolver.resolve("Sounds/hit.ogg");
        for _ in 0..5 {
            assert_eq!(resolver.resolve("Sounds/hit.ogg"), first);
        }
        assert_eq!(
            first.path(),
            Some(fx.layout.mods_dir.join("B/Sounds/hit.ogg").as_path())
        );
    }

    #[test]
    fn test_directories_are_not_resolved() {
        let fx = fixture();
        fs::create_dir_all(fx.layout.base_dir.join("Sounds")).unwrap();
        let registry = Registry::open(fx.layout.clone()).unwrap();

        assert!(!ContentResolver::new(&registry).resolve("Sounds").is_found());
    }

    #[test]
    fn test_pack_icon() {
        let fx = fixture();
        touch(&fx.layout.texture_packs_dir.join("HiRes/Pack.PNG"), "icon");
        fs::create_dir_all(fx.layout.mods_dir.join("Plain")).unwrap();
        let registry = Registry::open(fx.layout.clone()).unwrap();
        let resolver = ContentResolver::new(&registry);

        assert_eq!(
            resolver.pack_icon("HiRes"),
            ResolvedPath::Found(fx.layout.texture_packs_dir.join("HiRes/Pack.PNG"))
        );
        assert_eq!(resolver.pack_icon("Plain"), ResolvedPath::NotFound);
        assert_eq!(resolver.pack_icon("Nobody"), ResolvedPath::NotFound);
    }
}
