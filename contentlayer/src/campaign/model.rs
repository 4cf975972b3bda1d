//! Campaign data model.

use std::path::PathBuf;

/// Default `Width` of a level marker on the world map.
pub const DEFAULT_LEVEL_WIDTH: i32 = 10;

/// Default `ChooseNext` value: the player picks the next level.
pub const DEFAULT_CHOOSE_NEXT: i32 = 1;

// World map placement: level coordinates are in a 512x512 space drawn into a
// 400px map offset by (150, 60).
const MAP_OFFSET_X: i32 = 30 + 120;
const MAP_OFFSET_Y: i32 = 30 + 30;
const MAP_SOURCE_SIZE: i32 = 512;
const MAP_DRAWN_SIZE: i32 = 400;

/// Position of a level on the campaign world map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapLocation {
    pub x: i32,
    pub y: i32,
}

/// One level of a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignLevel {
    /// Map identifier passed to the level loader.
    pub map_name: String,

    /// Text shown for the level, underscores rendered as spaces.
    pub description: String,

    /// How the next level is picked; `1` lets the player choose.
    pub choose_next: i32,

    pub location: MapLocation,

    /// Marker size on the world map.
    pub width: i32,

    /// 0-based indices of the levels that may follow this one.
    pub next_levels: Vec<usize>,
}

impl CampaignLevel {
    /// Level with default optional fields.
    pub fn new(map_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            map_name: map_name.into(),
            description: description.into(),
            choose_next: DEFAULT_CHOOSE_NEXT,
            location: MapLocation::default(),
            width: DEFAULT_LEVEL_WIDTH,
            next_levels: Vec::new(),
        }
    }

    /// Whether the player chooses among the successors.
    pub fn player_chooses(&self) -> bool {
        self.choose_next == DEFAULT_CHOOSE_NEXT
    }

    /// Top-left corner of the level marker in world map pixels.
    ///
    /// Coordinates outside the map saturate at the `i32` range.
    pub fn map_start(&self) -> (i32, i32) {
        let x = i64::from(MAP_OFFSET_X)
            + i64::from(self.location.x) * i64::from(MAP_DRAWN_SIZE) / i64::from(MAP_SOURCE_SIZE);
        let y = i64::from(MAP_OFFSET_Y)
            + (i64::from(MAP_SOURCE_SIZE) - i64::from(self.location.y)) * i64::from(MAP_DRAWN_SIZE)
                / i64::from(MAP_SOURCE_SIZE);
        (saturate(x), saturate(y))
    }

    /// Bottom-right corner of the level marker in world map pixels.
    pub fn map_end(&self) -> (i32, i32) {
        let (x, y) = self.map_start();
        (x.saturating_add(self.width), y.saturating_add(self.width))
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Text shown when a campaign is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndText {
    pub title: String,
    pub body: Vec<String>,
}

impl EndText {
    /// The stock ending used when a campaign supplies none.
    pub fn default_for(campaign: &str) -> Self {
        Self {
            title: "Congratulations!".to_string(),
            body: vec![
                format!("You have completed {} campaign", campaign),
                "and restored peace to the island of Lugaru.".to_string(),
            ],
        }
    }
}

/// A loaded campaign. Built fresh on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    /// Campaign id, the descriptor's file stem.
    pub name: String,

    /// Levels in descriptor order.
    pub levels: Vec<CampaignLevel>,

    pub end_text: EndText,

    /// Descriptor the campaign was read from.
    pub source: PathBuf,

    /// World overview image, if one resolved.
    pub world_image: Option<PathBuf>,
}

impl Campaign {
    /// The first level, where a new playthrough starts.
    pub fn first_level(&self) -> Option<&CampaignLevel> {
        self.levels.first()
    }

    /// Levels that may follow the level at `index`.
    pub fn successors(&self, index: usize) -> Vec<&CampaignLevel> {
        self.levels
            .get(index)
            .map(|level| {
                level
                    .next_levels
                    .iter()
                    .filter_map(|&next| self.levels.get(next))
                    .collect()
            })
            .unwrap_or_default()
    }
}
