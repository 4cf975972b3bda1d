//! Package registry.
//!
//! The registry records every known content package with its kind, status
//! and metadata, and persists that record between runs.
//!
//! - [`Registry::load`] restores persisted state through
//!   [`RegistryStore::load_registry`], which reads the JSON manifest or
//!   falls back to the legacy line list
//! - [`Registry::scan_and_reconcile`] brings the record in line with the
//!   `Mods/` and `TexturePacks/` directories
//! - [`Registry::begin_edit`], [`Registry::move_package`],
//!   [`Registry::apply`] and [`Registry::discard`] stage and commit
//!   enable/disable changes
//!
//! # Example
//!
//! ```
//! use contentlayer::config::ContentLayout;
//! use contentlayer::registry::{PendingSet, Registry};
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let layout = ContentLayout::new(temp.path().join("Data"), temp.path());
//! std::fs::create_dir_all(layout.mods_dir.join("NightPatrol")).unwrap();
//!
//! let mut registry = Registry::open(layout).unwrap();
//! assert!(!registry.get("NightPatrol").unwrap().is_enabled());
//!
//! registry.begin_edit();
//! registry.move_package("NightPatrol", PendingSet::Available, PendingSet::Enabled);
//! registry.apply(&|| println!("reloading")).unwrap();
//!
//! assert_eq!(registry.enabled_ids(), ["NightPatrol"]);
//! ```

mod core;
mod edit;
mod encoding;
mod error;
mod scan;
mod store;

pub use self::core::Registry;
pub use edit::{PendingSet, ReloadHandler};
pub use encoding::{
    decode_lines, decode_manifest, encode_manifest, ManifestError, PersistedEntry,
    PersistedRegistry, RegistryEncoding, LEGACY_LIST_FILE, MANIFEST_FILE,
};
pub use error::{RegistryError, RegistryResult};
pub use scan::{discover_packages, DiscoveredPackage, ScanReport};
pub use store::{LoadedRegistry, RegistryStore};
