//! Resolution results.

use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of a content lookup.
///
/// `Found` always holds a path that existed as a regular file when the
/// lookup ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    Found(PathBuf),
    NotFound,
}

impl ResolvedPath {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolvedPath::Found(_))
    }

    /// The resolved path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolvedPath::Found(path) => Some(path),
            ResolvedPath::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            ResolvedPath::Found(path) => Some(path),
            ResolvedPath::NotFound => None,
        }
    }
}

impl From<Option<PathBuf>> for ResolvedPath {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(ResolvedPath::NotFound, ResolvedPath::Found)
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedPath::Found(path) => write!(f, "{}", path.display()),
            ResolvedPath::NotFound => write!(f, "not found"),
        }
    }
}

/// Which layer served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionLayer {
    /// An enabled texture pack.
    TexturePack,

    /// A package named by the path's first segment.
    Qualified,

    /// An enabled mod.
    Mod,

    /// The base game.
    BaseGame,
}

impl fmt::Display for ResolutionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionLayer::TexturePack => write!(f, "texture pack"),
            ResolutionLayer::Qualified => write!(f, "qualified"),
            ResolutionLayer::Mod => write!(f, "mod"),
            ResolutionLayer::BaseGame => write!(f, "base game"),
        }
    }
}

/// A successful lookup with the package that served it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub package_id: String,
    pub layer: ResolutionLayer,
}
