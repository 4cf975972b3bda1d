//! Campaign descriptor parsing.
//!
//! A descriptor is a JSON document:
//!
//! ```json
//! {
//!     "Levels": [
//!         {
//!             "Name": "Village",
//!             "Description": "Defend_the_village",
//!             "ChooseNext": 1,
//!             "LocationX": 120,
//!             "LocationY": 300,
//!             "NextLevel": [2, 3]
//!         }
//!     ],
//!     "EndText": "Well done!\nThe island is safe."
//! }
//! ```
//!
//! Parsing is lenient per level: a level without `Name` or `Description` is
//! skipped, optional fields default, and successor references to missing or
//! skipped levels are dropped. Only a document that isn't JSON or has no
//! `Levels` array fails as a whole.

use serde_json::{Map, Value};

use super::error::CampaignParseError;
use super::model::{CampaignLevel, EndText, MapLocation, DEFAULT_CHOOSE_NEXT, DEFAULT_LEVEL_WIDTH};

/// Levels and ending parsed from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCampaign {
    pub levels: Vec<CampaignLevel>,
    pub end_text: EndText,
}

/// Level as read, with successors still as indices into the raw array.
struct RawLevel {
    level: CampaignLevel,
    raw_next: Vec<usize>,
}

/// Parse descriptor text for the campaign `name`.
pub fn parse_campaign(name: &str, text: &str) -> Result<ParsedCampaign, CampaignParseError> {
    let root: Value = serde_json::from_str(text)?;
    let object = root.as_object().ok_or(CampaignParseError::NotAnObject)?;
    let items = object
        .get("Levels")
        .and_then(Value::as_array)
        .ok_or(CampaignParseError::MissingLevels)?;

    // raw index -> index among kept levels
    let mut remap: Vec<Option<usize>> = Vec::with_capacity(items.len());
    let mut raw_levels = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match parse_level(name, index, item) {
            Some(raw) => {
                remap.push(Some(raw_levels.len()));
                raw_levels.push(raw);
            }
            None => remap.push(None),
        }
    }

    let levels = raw_levels
        .into_iter()
        .map(|RawLevel { mut level, raw_next }| {
            level.next_levels = raw_next
                .into_iter()
                .filter_map(|raw| {
                    let mapped = remap.get(raw).copied().flatten();
                    if mapped.is_none() {
                        tracing::warn!(
                            campaign = name,
                            level = %level.map_name,
                            successor = raw + 1,
                            "Dropping successor that names no loaded level"
                        );
                    }
                    mapped
                })
                .collect();
            level
        })
        .collect();

    let end_text = object
        .get("EndText")
        .and_then(parse_end_text)
        .unwrap_or_else(|| EndText::default_for(name));

    Ok(ParsedCampaign { levels, end_text })
}

fn parse_level(campaign: &str, index: usize, item: &Value) -> Option<RawLevel> {
    let Some(fields) = item.as_object() else {
        tracing::warn!(campaign, index, "Skipping campaign level that is not an object");
        return None;
    };

    let map_name = text_field(fields, "Name");
    let description = text_field(fields, "Description");
    let (Some(map_name), Some(description)) = (map_name, description) else {
        tracing::warn!(campaign, index, "Skipping campaign level without Name or Description");
        return None;
    };

    let mut level = CampaignLevel::new(map_name, description.replace('_', " "));
    level.choose_next = int_field(fields, "ChooseNext")
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(DEFAULT_CHOOSE_NEXT);
    level.location = MapLocation {
        x: int_field(fields, "LocationX")
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0),
        y: int_field(fields, "LocationY")
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0),
    };
    level.width = int_field(fields, "Width")
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(DEFAULT_LEVEL_WIDTH);

    let mut next: Vec<i64> = match fields.get("NextLevel") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.iter().filter_map(as_int).collect(),
        Some(value) => as_int(value).into_iter().collect(),
    };
    if let Some(count) = int_field(fields, "NumNext") {
        next.truncate(usize::try_from(count).unwrap_or(0));
    }

    // 1-based on disk
    let raw_next = next
        .into_iter()
        .filter_map(|n| match usize::try_from(n) {
            Ok(n) if n >= 1 => Some(n - 1),
            _ => {
                tracing::warn!(campaign, index, successor = n, "Ignoring invalid successor index");
                None
            }
        })
        .collect();

    Some(RawLevel { level, raw_next })
}

fn parse_end_text(value: &Value) -> Option<EndText> {
    let lines: Vec<String> = match value {
        Value::String(text) => text.lines().map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => return None,
    };

    let mut lines = lines.into_iter();
    let title = lines.next()?;
    Some(EndText {
        title,
        body: lines.collect(),
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn int_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    fields.get(key).and_then(as_int)
}

/// Integer from a JSON number or numeric string.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
