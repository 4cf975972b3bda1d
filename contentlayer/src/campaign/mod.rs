//! Campaigns.
//!
//! A campaign is a JSON descriptor at `Campaigns/<name>.json` in any enabled
//! package or the base game, found through the content resolver. Loading a
//! campaign that is missing or unusable falls back to the default campaign
//! once; if that fails too, the load fails.

mod descriptor;
mod error;
mod loader;
mod model;
mod profile;

pub use descriptor::{parse_campaign, ParsedCampaign};
pub use error::{CampaignError, CampaignParseError, CampaignResult};
pub use loader::{
    final_state, CampaignLoadState, CampaignLoader, LoadedCampaign, BASE_WORLD_IMAGE, CAMPAIGNS_DIR,
    CAMPAIGN_EXTENSION,
};
pub use model::{
    Campaign, CampaignLevel, EndText, MapLocation, DEFAULT_CHOOSE_NEXT, DEFAULT_LEVEL_WIDTH,
};
pub use profile::{CampaignProgress, InMemoryProfile, PlayerProfile};
