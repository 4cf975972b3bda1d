//! Content package types and descriptor parsing.
//!
//! # Overview
//!
//! Content comes from three kinds of package:
//!
//! - **Base game**: the installed, read-only content directory
//! - **Mod**: a folder under the user's `Mods/` directory
//! - **Texture pack**: a folder under the user's `TexturePacks/` directory
//!
//! Each package may carry a `modinfo.json` descriptor with display metadata.
//! The descriptor is optional and every field defaults on its own:
//!
//! | Field         | Default                      |
//! |---------------|------------------------------|
//! | `Name`        | the package id (folder name) |
//! | `Description` | `No description available.`  |
//! | `Version`     | `1.0`                        |
//! | `Author`      | `Unknown`                    |

mod core;
mod descriptor;

pub use self::core::{ContentPackage, PackageKind, PackageStatus, BASE_GAME_ID};
pub use descriptor::{
    load_metadata, parse_descriptor, DescriptorError, PackageMetadata, DEFAULT_AUTHOR,
    DEFAULT_DESCRIPTION, DEFAULT_VERSION, DESCRIPTOR_FILE,
};
