//! ContentLayer - layered content resolution for game packages
//!
//! This library resolves logical content requests (a sound, a texture, a
//! campaign descriptor) into concrete files drawn from the base game, the
//! enabled mods and the enabled texture packs, honouring a persisted
//! enable/disable registry.
//!
//! # Modules
//!
//! - [`paths`]: user directories and case-insensitive file lookup
//! - [`package`]: package identity and per-package descriptors
//! - [`registry`]: the durable package registry and its mutation API
//! - [`resolver`]: priority-ordered path resolution
//! - [`campaign`]: campaign discovery, parsing and fallback
//! - [`config`]: INI configuration and directory layout
//! - [`logging`]: tracing subscriber setup

pub mod campaign;
pub mod config;
pub mod logging;
pub mod package;
pub mod paths;
pub mod registry;
pub mod resolver;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
