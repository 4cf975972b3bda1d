//! Core package identity types.
//!
//! The [`ContentPackage`] struct represents one discoverable unit of content:
//! the base game, a mod or a texture pack.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::descriptor::PackageMetadata;

/// Kind of content package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    /// The installed game content. Always enabled, never toggled.
    BaseGame,

    /// A mod package from the user's `Mods/` directory.
    Mod,

    /// A texture replacement package from the user's `TexturePacks/` directory.
    TexturePack,
}

impl PackageKind {
    /// Status given to a package of this kind the first time it is discovered.
    ///
    /// Mods start available, texture packs start enabled. The base game is
    /// always enabled.
    pub fn default_status(&self) -> PackageStatus {
        match self {
            PackageKind::BaseGame => PackageStatus::Enabled,
            PackageKind::Mod => PackageStatus::Available,
            PackageKind::TexturePack => PackageStatus::Enabled,
        }
    }

    /// Whether the user may enable or disable packages of this kind.
    pub fn is_toggleable(&self) -> bool {
        !matches!(self, PackageKind::BaseGame)
    }

    /// Value of the `PackType` field in the manifest encoding.
    pub fn pack_type(&self) -> &'static str {
        match self {
            PackageKind::BaseGame => "Base",
            PackageKind::Mod => "Mod",
            PackageKind::TexturePack => "Texture",
        }
    }

    /// Parse a manifest `PackType` value (case-insensitive).
    pub fn from_pack_type(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mod" => Some(PackageKind::Mod),
            "texture" | "texturepack" => Some(PackageKind::TexturePack),
            _ => None,
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageKind::BaseGame => write!(f, "base game"),
            PackageKind::Mod => write!(f, "mod"),
            PackageKind::TexturePack => write!(f, "texture pack"),
        }
    }
}

/// Enable state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageStatus {
    /// Searched by the resolver.
    Enabled,

    /// Installed but ignored by the resolver.
    Available,
}

impl PackageStatus {
    /// Status flag used by the line encoding (`1` enabled, `0` available).
    pub fn flag(&self) -> u8 {
        match self {
            PackageStatus::Enabled => 1,
            PackageStatus::Available => 0,
        }
    }

    /// Parse a line-encoding status flag.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "1" => Some(PackageStatus::Enabled),
            "0" => Some(PackageStatus::Available),
            _ => None,
        }
    }

    /// Value of the `Status` field in the manifest encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Enabled => "Enabled",
            PackageStatus::Available => "Available",
        }
    }

    /// Parse a manifest `Status` value (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "enabled" => Some(PackageStatus::Enabled),
            "available" | "disabled" => Some(PackageStatus::Available),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, PackageStatus::Enabled)
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content package known to the registry.
///
/// # Example
///
/// ```
/// use contentlayer::package::{ContentPackage, PackageKind, PackageStatus};
///
/// let package = ContentPackage::new("NightPatrol", PackageKind::Mod, "/data/Mods/NightPatrol");
///
/// assert_eq!(package.id, "NightPatrol");
/// assert_eq!(package.status, PackageStatus::Available);
/// assert_eq!(package.metadata.name, "NightPatrol");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPackage {
    /// Folder name. Unique within a registry and stable across runs.
    pub id: String,

    /// Package kind.
    pub kind: PackageKind,

    /// Enable state.
    pub status: PackageStatus,

    /// Root directory searched by the resolver.
    pub root: PathBuf,

    /// Display metadata, defaulted from `id` when no descriptor exists.
    pub metadata: PackageMetadata,
}

impl ContentPackage {
    /// Create a package with default metadata and the kind's default status.
    pub fn new(id: impl Into<String>, kind: PackageKind, root: impl Into<PathBuf>) -> Self {
        let id = id.into();
        Self {
            metadata: PackageMetadata::for_id(&id),
            id,
            kind,
            status: kind.default_status(),
            root: root.into(),
        }
    }

    /// The base game package rooted at the installed-content directory.
    pub fn base_game(root: impl Into<PathBuf>) -> Self {
        Self::new(BASE_GAME_ID, PackageKind::BaseGame, root)
    }

    /// Set the status (builder pattern).
    pub fn with_status(mut self, status: PackageStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the metadata (builder pattern).
    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Root directory of the package.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the resolver searches this package.
    pub fn is_enabled(&self) -> bool {
        self.kind == PackageKind::BaseGame || self.status.is_enabled()
    }
}

impl fmt::Display for ContentPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, v{})",
            self.id, self.kind, self.status, self.metadata.version
        )
    }
}

/// Identifier of the base game package.
pub const BASE_GAME_ID: &str = "base";
