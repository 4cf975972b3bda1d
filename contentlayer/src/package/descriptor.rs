//! Per-package descriptor (`modinfo.json`) parsing.
//!
//! A descriptor is optional. Each field falls back to its default on its
//! own, so a descriptor with a bad `Version` still contributes its `Name`.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// File name of the per-package descriptor.
pub const DESCRIPTOR_FILE: &str = "modinfo.json";

/// Description shown when a package doesn't provide one.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// Version shown when a package doesn't provide one.
pub const DEFAULT_VERSION: &str = "1.0";

/// Author shown when a package doesn't provide one.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Errors reading a whole descriptor file.
///
/// These never escape [`load_metadata`]; they are logged and the package
/// falls back to default metadata.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read descriptor: {0}")]
    Io(#[from] io::Error),

    #[error("descriptor is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("descriptor root must be an object")]
    NotAnObject,
}

/// Display metadata for a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
}

impl PackageMetadata {
    /// Default metadata for a package that has no descriptor.
    pub fn for_id(id: &str) -> Self {
        Self {
            name: id.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            version: DEFAULT_VERSION.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// Parse descriptor text, defaulting each missing or mistyped field.
///
/// Keys are matched in both `Name` and `name` spellings.
pub fn parse_descriptor(id: &str, text: &str) -> Result<PackageMetadata, DescriptorError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(DescriptorError::NotAnObject)?;

    let defaults = PackageMetadata::for_id(id);
    Ok(PackageMetadata {
        name: string_field(object, "Name").unwrap_or(defaults.name),
        description: string_field(object, "Description").unwrap_or(defaults.description),
        version: string_field(object, "Version").unwrap_or(defaults.version),
        author: string_field(object, "Author").unwrap_or(defaults.author),
    })
}

/// Load metadata for the package rooted at `root`.
///
/// A missing descriptor is normal and yields defaults silently. An unreadable
/// or malformed descriptor is logged and also yields defaults.
pub fn load_metadata(id: &str, root: &Path) -> PackageMetadata {
    let path = root.join(DESCRIPTOR_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return PackageMetadata::for_id(id);
        }
        Err(e) => {
            tracing::warn!(package = id, path = %path.display(), error = %e, "Unreadable package descriptor");
            return PackageMetadata::for_id(id);
        }
    };

    match parse_descriptor(id, &text) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(package = id, path = %path.display(), error = %e, "Malformed package descriptor, using defaults");
            PackageMetadata::for_id(id)
        }
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    let lower = key.to_ascii_lowercase();
    object
        .get(key)
        .or_else(|| object.get(&lower))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
