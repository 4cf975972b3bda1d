//! Case-insensitive file lookup and relative path normalization.

use std::fs;
use std::path::{Path, PathBuf};

/// Find `requested_name` inside `directory`, tolerating case differences.
///
/// An exact match is returned immediately. Otherwise the directory is
/// enumerated once and the first entry whose name equals `requested_name`
/// under an ASCII case fold is returned. Returns `None` when the directory
/// does not exist or nothing matches.
///
/// # Example
///
/// ```
/// use contentlayer::paths::find_case_insensitive;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// std::fs::write(temp.path().join("world.PNG"), b"png").unwrap();
///
/// let found = find_case_insensitive(temp.path(), "World.png").unwrap();
/// assert_eq!(found, temp.path().join("world.PNG"));
/// assert!(find_case_insensitive(temp.path(), "Other.png").is_none());
/// ```
pub fn find_case_insensitive(directory: &Path, requested_name: &str) -> Option<PathBuf> {
    if requested_name.is_empty() || requested_name.contains(['/', '\\']) {
        return None;
    }

    let exact = directory.join(requested_name);
    if exact.exists() {
        return Some(exact);
    }

    let entries = fs::read_dir(directory).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if let Some(name) = name.to_str() {
            if name.eq_ignore_ascii_case(requested_name) {
                return Some(entry.path());
            }
        }
    }

    None
}

/// Find a normalized relative file path beneath `root`.
///
/// Each segment is matched with [`find_case_insensitive`], so
/// `sounds/ALARM.ogg` finds `Sounds/alarm.ogg`. The final segment must be a
/// regular file; intermediate segments must be directories.
pub fn find_relative(root: &Path, relative: &str) -> Option<PathBuf> {
    let exact = root.join(relative);
    if exact.is_file() {
        return Some(exact);
    }

    let segments: Vec<&str> = relative.split('/').collect();
    let (last, parents) = segments.split_last()?;

    let mut current = root.to_path_buf();
    for segment in parents {
        current = find_case_insensitive(&current, segment)?;
        if !current.is_dir() {
            return None;
        }
    }

    let candidate = find_case_insensitive(&current, last)?;
    candidate.is_file().then_some(candidate)
}

/// Normalize a logical content path into `/`-separated segments.
///
/// Backslashes become forward slashes, doubled separators and `.` segments
/// collapse, and leading separators are dropped. Paths that climb out of
/// their root (`..`) or that are empty after normalization yield `None`.
///
/// # Example
///
/// ```
/// use contentlayer::paths::normalize_relative;
///
/// assert_eq!(
///     normalize_relative("/Textures//World.png").as_deref(),
///     Some("Textures/World.png")
/// );
/// assert_eq!(normalize_relative("../secret"), None);
/// ```
pub fn normalize_relative(raw: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return None,
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
