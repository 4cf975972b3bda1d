//! Persistence encodings for the registry.
//!
//! Two formats exist on disk:
//!
//! - **Manifest** (`packlist.json`), the canonical format:
//!
//!   ```json
//!   {
//!       "Packs": {
//!           "Mods": [
//!               {
//!                   "ModName": "NightPatrol",
//!                   "Description": "Guards walk the walls at night.",
//!                   "Version": "2.1",
//!                   "Author": "Turner",
//!                   "PackType": "Mod",
//!                   "Status": "Enabled"
//!               }
//!           ],
//!           "TexturePacks": []
//!       }
//!   }
//!   ```
//!
//! - **Lines** (`modlist.txt`), the legacy format: one `id: 0|1` per line.
//!   It carries no kind and no metadata; both are recovered from disk.
//!
//! Entry order is significant in both: enabled entries appear in priority
//! order.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::error::{RegistryError, RegistryResult};
use crate::package::{PackageKind, PackageStatus};

/// File name of the manifest encoding.
pub const MANIFEST_FILE: &str = "packlist.json";

/// File name of the legacy line encoding.
pub const LEGACY_LIST_FILE: &str = "modlist.txt";

/// Which encoding a registry was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEncoding {
    Manifest,
    Lines,
}

impl std::fmt::Display for RegistryEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEncoding::Manifest => write!(f, "manifest"),
            RegistryEncoding::Lines => write!(f, "line list"),
        }
    }
}

/// Whole-document failures of the manifest encoding.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest has no \"Packs\" object")]
    MissingPacks,
}

/// One package as recorded on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedEntry {
    pub id: String,

    /// `None` when read from the line encoding.
    pub kind: Option<PackageKind>,

    pub status: PackageStatus,
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
}

impl PersistedEntry {
    /// Entry with only an id and status, as the line encoding provides.
    pub fn new(id: impl Into<String>, status: PackageStatus) -> Self {
        Self {
            id: id.into(),
            kind: None,
            status,
            description: None,
            version: None,
            author: None,
        }
    }

    /// Set the kind (builder pattern).
    pub fn with_kind(mut self, kind: PackageKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Ordered registry contents as read from or written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedRegistry {
    pub entries: Vec<PersistedEntry>,
}

impl PersistedRegistry {
    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&PersistedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry unless its id is already present.
    fn push_unique(&mut self, entry: PersistedEntry) {
        if self.get(&entry.id).is_some() {
            tracing::warn!(package = %entry.id, "Duplicate registry entry ignored");
            return;
        }
        self.entries.push(entry);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManifestEntry {
    mod_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pack_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ManifestDocument {
    packs: ManifestPacks,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ManifestPacks {
    mods: Vec<ManifestEntry>,
    texture_packs: Vec<ManifestEntry>,
}

/// Decode the manifest encoding.
///
/// Individual malformed entries are skipped with a warning; only a document
/// that isn't JSON or lacks `Packs` fails as a whole.
pub fn decode_manifest(text: &str) -> Result<PersistedRegistry, ManifestError> {
    let root: Value = serde_json::from_str(text)?;
    let packs = root
        .get("Packs")
        .and_then(Value::as_object)
        .ok_or(ManifestError::MissingPacks)?;

    let mut registry = PersistedRegistry::default();
    for (section, section_kind) in [
        ("Mods", PackageKind::Mod),
        ("TexturePacks", PackageKind::TexturePack),
    ] {
        let items = match packs.get(section) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) => items,
            Some(_) => {
                tracing::warn!(section, "Manifest section is not an array, ignoring");
                continue;
            }
        };

        for (index, item) in items.iter().enumerate() {
            let entry: ManifestEntry = match serde_json::from_value(item.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(section, index, error = %e, "Skipping malformed manifest entry");
                    continue;
                }
            };
            if entry.mod_name.trim().is_empty() {
                tracing::warn!(section, index, "Skipping manifest entry without a name");
                continue;
            }

            let kind = entry
                .pack_type
                .as_deref()
                .and_then(PackageKind::from_pack_type)
                .unwrap_or(section_kind);
            let status = match entry.status.as_deref().map(PackageStatus::parse) {
                Some(Some(status)) => status,
                _ => {
                    tracing::warn!(
                        package = %entry.mod_name,
                        status = ?entry.status,
                        "Unrecognised status in manifest, using default"
                    );
                    kind.default_status()
                }
            };

            registry.push_unique(PersistedEntry {
                id: entry.mod_name.trim().to_string(),
                kind: Some(kind),
                status,
                description: entry.description,
                version: entry.version,
                author: entry.author,
            });
        }
    }

    Ok(registry)
}

/// Encode the manifest encoding.
///
/// Output is pretty-printed with four-space indentation and ends with a
/// newline; equal inputs always produce identical bytes.
pub fn encode_manifest(registry: &PersistedRegistry) -> RegistryResult<String> {
    let mut packs = ManifestPacks {
        mods: Vec::new(),
        texture_packs: Vec::new(),
    };

    for entry in &registry.entries {
        let kind = entry.kind.unwrap_or(PackageKind::Mod);
        let manifest_entry = ManifestEntry {
            mod_name: entry.id.clone(),
            description: entry.description.clone(),
            version: entry.version.clone(),
            author: entry.author.clone(),
            pack_type: Some(kind.pack_type().to_string()),
            status: Some(entry.status.as_str().to_string()),
        };
        match kind {
            PackageKind::TexturePack => packs.texture_packs.push(manifest_entry),
            _ => packs.mods.push(manifest_entry),
        }
    }

    let document = ManifestDocument { packs };
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| RegistryError::EncodeFailed(e.to_string()))?;

    let mut text =
        String::from_utf8(buffer).map_err(|e| RegistryError::EncodeFailed(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // id (up to the first colon), colon, status token
        Regex::new(r"^\s*([^:]*?)\s*:\s*(\S*)\s*$").expect("line pattern is valid")
    })
}

/// Decode the legacy line encoding.
///
/// Blank lines are ignored; lines that don't match `id: 0|1` are skipped
/// with a warning.
pub fn decode_lines(text: &str) -> PersistedRegistry {
    let mut registry = PersistedRegistry::default();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let parsed = line_pattern().captures(line).and_then(|caps| {
            let id = caps.get(1)?.as_str();
            let status = PackageStatus::from_flag(caps.get(2)?.as_str())?;
            (!id.is_empty()).then(|| PersistedEntry::new(id, status))
        });

        match parsed {
            Some(entry) => registry.push_unique(entry),
            None => tracing::warn!(line = number + 1, content = line, "Skipping malformed line in mod list"),
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Legacy line list text for `registry`; only the manifest is ever written.
    fn encode_lines(registry: &PersistedRegistry) -> String {
        registry
            .entries
            .iter()
            .map(|entry| format!("{}: {}\n", entry.id, entry.status.flag()))
            .collect()
    }

    fn sample() -> PersistedRegistry {
        PersistedRegistry {
            entries: vec![
                PersistedEntry {
                    id: "NightPatrol".to_string(),
                    kind: Some(PackageKind::Mod),
                    status: PackageStatus::Enabled,
                    description: Some("Guards at night.".to_string()),
                    version: Some("2.1".to_string()),
                    author: Some("Turner".to_string()),
                },
                PersistedEntry::new("ForestPack", PackageStatus::Available)
                    .with_kind(PackageKind::TexturePack),
                PersistedEntry::new("Arena", PackageStatus::Available).with_kind(PackageKind::Mod),
            ],
        }
    }

    #[test]
    fn test_manifest_layout() {
        let text = encode_manifest(&sample()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        let mods = value["Packs"]["Mods"].as_array().unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0]["ModName"], "NightPatrol");
        assert_eq!(mods[0]["PackType"], "Mod");
        assert_eq!(mods[0]["Status"], "Enabled");
        assert_eq!(mods[1]["ModName"], "Arena");

        let textures = value["Packs"]["TexturePacks"].as_array().unwrap();
        assert_eq!(textures[0]["ModName"], "ForestPack");
        assert_eq!(textures[0]["PackType"], "Texture");

        assert!(text.contains("\n        \"Mods\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_manifest_decode_recovers_entries() {
        let decoded = decode_manifest(&encode_manifest(&sample()).unwrap()).unwrap();

        let night = decoded.get("NightPatrol").unwrap();
        assert_eq!(night.kind, Some(PackageKind::Mod));
        assert_eq!(night.status, PackageStatus::Enabled);
        assert_eq!(night.author.as_deref(), Some("Turner"));
        assert_eq!(
            decoded.get("ForestPack").unwrap().kind,
            Some(PackageKind::TexturePack)
        );
    }

    #[test]
    fn test_manifest_skips_bad_entries() {
        let text = r#"{
            "Packs": {
                "Mods": [
                    {"ModName": "Good", "Status": "Enabled"},
                    {"Description": "no name"},
                    42,
                    {"ModName": "Good", "Status": "Available"},
                    {"ModName": "Odd", "Status": "Sometimes"}
                ],
                "TexturePacks": "oops"
            }
        }"#;

        let decoded = decode_manifest(text).unwrap();
        assert_eq!(decoded.entries.len(), 2);
        assert_eq!(decoded.get("Good").unwrap().status, PackageStatus::Enabled);
        assert_eq!(decoded.get("Odd").unwrap().status, PackageStatus::Available);
    }

    #[test]
    fn test_manifest_whole_document_errors() {
        assert!(matches!(
            decode_manifest("NightPatrol: 1"),
            Err(ManifestError::Json(_))
        ));
        assert!(matches!(
            decode_manifest(r#"{"Mods": []}"#),
            Err(ManifestError::MissingPacks)
        ));
    }

    #[test]
    fn test_decode_lines() {
        let text = "NightPatrol: 1\nArena:0\n\n  Spaced Out :  1  \nbroken line\nBad: 7\n";
        let decoded = decode_lines(text);

        let ids: Vec<&str> = decoded.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["NightPatrol", "Arena", "Spaced Out"]);
        assert_eq!(decoded.entries[0].status, PackageStatus::Enabled);
        assert_eq!(decoded.entries[1].status, PackageStatus::Available);
        assert!(decoded.entries.iter().all(|e| e.kind.is_none()));
    }

    #[test]
    fn test_lines_to_manifest_migration() {
        let legacy = decode_lines("NightPatrol: 1\nArena: 0\n");
        let migrated = decode_manifest(&encode_manifest(&legacy).unwrap()).unwrap();

        assert_eq!(migrated.entries.len(), 2);
        assert_eq!(migrated.entries[0].id, "NightPatrol");
        assert_eq!(migrated.entries[0].status, PackageStatus::Enabled);
        assert_eq!(migrated.entries[0].kind, Some(PackageKind::Mod));
        assert_eq!(encode_lines(&migrated), "NightPatrol: 1\nArena: 0\n");
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_decode_lines_never_panics(text in "\\PC{0,200}") {
                let _ = decode_lines(&text);
            }

            #[test]
            fn test_line_ids_survive_encoding(
                ids in proptest::collection::btree_set("[A-Za-z][A-Za-z0-9_ -]{0,15}[A-Za-z0-9]", 0..8),
                flags in proptest::collection::vec(any::<bool>(), 8)
            ) {
                let registry = PersistedRegistry {
                    entries: ids
                        .iter()
                        .zip(flags.iter())
                        .map(|(id, enabled)| {
                            let status = if *enabled { PackageStatus::Enabled } else { PackageStatus::Available };
                            PersistedEntry::new(id.clone(), status)
                        })
                        .collect(),
                };

                let decoded = decode_lines(&encode_lines(&registry));
                prop_assert_eq!(decoded, registry);
            }
        }
    }
}
