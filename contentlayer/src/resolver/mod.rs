//! Content resolution.
//!
//! [`ContentResolver`] turns a logical path such as `Sounds/alarm.ogg` into
//! the on-disk file that should be used, honouring texture packs, enabled
//! mods and package-qualified paths before falling back to the base game.

mod resolved;
mod search;

pub use resolved::{Resolution, ResolutionLayer, ResolvedPath};
pub use search::{ContentResolver, PACK_ICON_FILE};
