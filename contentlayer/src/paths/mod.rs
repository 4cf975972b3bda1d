//! Filesystem path utilities.
//!
//! This module covers the two path concerns every other component leans on:
//!
//! - [`AppDirs`]: platform-specific, user-writable directories (data,
//!   configuration, screenshots, saves) created on demand
//! - [`find_case_insensitive`] / [`find_relative`]: file lookup that tolerates
//!   content authored on case-insensitive filesystems
//!
//! # Lookup Rules
//!
//! An exact match always wins. Only when the exact name is missing is the
//! directory enumerated once, and the first entry whose name matches under
//! an ASCII case fold is returned. The result is therefore deterministic for
//! a fixed directory listing.

mod lookup;
mod user_dirs;

pub use lookup::{find_case_insensitive, find_relative, normalize_relative};
pub use user_dirs::{ensure_dir, AppDirs, PathError, PathResult, DEFAULT_APP_NAME};
