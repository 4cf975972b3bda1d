//! Campaign discovery and loading.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::descriptor::parse_campaign;
use super::error::{CampaignError, CampaignResult};
use super::model::Campaign;
use super::profile::PlayerProfile;
use crate::config::DEFAULT_CAMPAIGN;
use crate::paths::find_case_insensitive;
use crate::registry::Registry;
use crate::resolver::ContentResolver;

/// Directory holding campaign descriptors inside a package.
pub const CAMPAIGNS_DIR: &str = "Campaigns";

/// Extension of campaign descriptor files.
pub const CAMPAIGN_EXTENSION: &str = "json";

/// Base world overview image, used when a campaign has none of its own.
pub const BASE_WORLD_IMAGE: &str = "Textures/World.png";

/// Progress of a single load.
///
/// A load moves `Selected → Loaded`, or `Selected → Fallback → Loaded`, or
/// ends in `Failed`. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignLoadState {
    None,
    Selected,
    Fallback,
    Loaded,
    Failed,
}

impl fmt::Display for CampaignLoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CampaignLoadState::None => "none",
            CampaignLoadState::Selected => "selected",
            CampaignLoadState::Fallback => "fallback",
            CampaignLoadState::Loaded => "loaded",
            CampaignLoadState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A campaign together with the states its load passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCampaign {
    pub campaign: Campaign,
    pub states: Vec<CampaignLoadState>,
}

impl LoadedCampaign {
    /// Whether the default campaign was loaded in place of the request.
    pub fn fell_back(&self) -> bool {
        self.states.contains(&CampaignLoadState::Fallback)
    }
}

/// Final state of a load: `Loaded` on success, `Failed` otherwise.
pub fn final_state(result: &CampaignResult<LoadedCampaign>) -> CampaignLoadState {
    match result {
        Ok(loaded) => loaded
            .states
            .last()
            .copied()
            .unwrap_or(CampaignLoadState::None),
        Err(_) => CampaignLoadState::Failed,
    }
}

/// Finds and loads campaigns through the content resolver.
#[derive(Debug, Clone)]
pub struct CampaignLoader<'a> {
    registry: &'a Registry,
    default_campaign: String,
}

impl<'a> CampaignLoader<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            default_campaign: DEFAULT_CAMPAIGN.to_string(),
        }
    }

    /// Set the campaign loaded when the requested one cannot be.
    pub fn with_default_campaign(mut self, name: impl Into<String>) -> Self {
        self.default_campaign = name.into();
        self
    }

    pub fn default_campaign(&self) -> &str {
        &self.default_campaign
    }

    fn resolver(&self) -> ContentResolver<'a> {
        ContentResolver::new(self.registry)
    }

    /// Names of all available campaigns.
    ///
    /// Base game campaigns come first, then those of each enabled package in
    /// search order (texture packs, then mods). Names are sorted within each
    /// package and listed once.
    pub fn list_campaigns(&self) -> Vec<String> {
        let registry = self.registry;
        let roots = std::iter::once(registry.base_game())
            .chain(registry.enabled_texture_packs())
            .chain(registry.enabled_mods());

        let mut names: Vec<String> = Vec::new();
        for package in roots {
            for name in campaigns_in(package.root()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Load the campaign currently selected on `profile`.
    pub fn load_selected(&self, profile: &mut dyn PlayerProfile) -> CampaignResult<LoadedCampaign> {
        let name = profile.current_campaign().to_string();
        self.load_campaign(&name, profile)
    }

    /// Select and load `name`, falling back to the default campaign once.
    ///
    /// When `name` cannot be loaded the profile's selection is rewritten to
    /// the default campaign, which is tried exactly once. When the player has
    /// made no choices in the loaded campaign its score and timer are reset.
    pub fn load_campaign(
        &self,
        name: &str,
        profile: &mut dyn PlayerProfile,
    ) -> CampaignResult<LoadedCampaign> {
        profile.set_current_campaign(name);
        let mut states = vec![CampaignLoadState::Selected];

        let campaign = match self.read_campaign(name) {
            Ok(campaign) => campaign,
            Err(e) if name == self.default_campaign => {
                tracing::error!(campaign = name, error = %e, "Could not load the default campaign");
                return Err(self.exhausted(name, e));
            }
            Err(e) => {
                tracing::warn!(
                    campaign = name,
                    default = %self.default_campaign,
                    error = %e,
                    "Could not load campaign, falling back to default"
                );
                states.push(CampaignLoadState::Fallback);
                profile.set_current_campaign(&self.default_campaign);

                self.read_campaign(&self.default_campaign).map_err(|e| {
                    tracing::error!(
                        campaign = %self.default_campaign,
                        error = %e,
                        "Could not load the default campaign"
                    );
                    self.exhausted(name, e)
                })?
            }
        };
        states.push(CampaignLoadState::Loaded);

        if profile.campaign_choices_made() == 0 {
            tracing::debug!(campaign = %campaign.name, "New playthrough, resetting score and timer");
            profile.reset_campaign_progress();
        }

        tracing::info!(
            campaign = %campaign.name,
            levels = campaign.levels.len(),
            source = %campaign.source.display(),
            "Campaign loaded"
        );
        Ok(LoadedCampaign { campaign, states })
    }

    fn exhausted(&self, requested: &str, reason: CampaignError) -> CampaignError {
        CampaignError::FallbackExhausted {
            requested: requested.to_string(),
            default: self.default_campaign.clone(),
            reason: Box::new(reason),
        }
    }

    /// Resolve, read and parse one campaign. No fallback.
    pub fn read_campaign(&self, name: &str) -> CampaignResult<Campaign> {
        let not_found = || CampaignError::NotFound {
            name: name.to_string(),
        };
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(not_found());
        }

        let resolver = self.resolver();
        let relative = format!("{}/{}.{}", CAMPAIGNS_DIR, name, CAMPAIGN_EXTENSION);
        let path = resolver.resolve(&relative).into_path().ok_or_else(not_found)?;

        let text = fs::read_to_string(&path).map_err(|source| CampaignError::Read {
            path: path.clone(),
            source,
        })?;
        let parsed = parse_campaign(name, &text).map_err(|reason| CampaignError::Malformed {
            path: path.clone(),
            reason,
        })?;

        Ok(Campaign {
            name: name.to_string(),
            levels: parsed.levels,
            end_text: parsed.end_text,
            world_image: self.world_image(name),
            source: path,
        })
    }

    /// `Textures/<name>/World.png`, else the base world image, else none.
    fn world_image(&self, name: &str) -> Option<PathBuf> {
        let resolver = self.resolver();
        let scoped = format!("Textures/{}/World.png", name);
        resolver
            .resolve(&scoped)
            .into_path()
            .or_else(|| resolver.resolve(BASE_WORLD_IMAGE).into_path())
    }
}

/// Campaign names in `root`'s campaign directory, sorted.
fn campaigns_in(root: &Path) -> Vec<String> {
    let Some(dir) = find_case_insensitive(root, CAMPAIGNS_DIR).filter(|d| d.is_dir()) else {
        return Vec::new();
    };
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "Cannot list campaigns");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CAMPAIGN_EXTENSION))
        })
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::profile::InMemoryProfile;
    use crate::config::ContentLayout;
    use crate::registry::PendingSet;
    use tempfile::TempDir;

    const SIMPLE: &str = r#"{"Levels": [{"Name": "Village", "Description": "Start"}]}"#;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn setup() -> (TempDir, ContentLayout) {
        let temp = TempDir::new().unwrap();
        let layout = ContentLayout::new(temp.path().join("Data"), temp.path().join("user"));
        fs::create_dir_all(&layout.base_dir).unwrap();
        (temp, layout)
    }

    #[test]
    fn test_load_requested_campaign() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        write(&layout.base_dir.join("Campaigns/dunes.json"), SIMPLE);
        let registry = Registry::open(layout).unwrap();
        let loader = CampaignLoader::new(&registry);
        let mut profile = InMemoryProfile::new("ana");

        let loaded = loader.load_campaign("dunes", &mut profile).unwrap();

        assert_eq!(loaded.campaign.name, "dunes");
        assert_eq!(
            loaded.states,
            [CampaignLoadState::Selected, CampaignLoadState::Loaded]
        );
        assert!(!loaded.fell_back());
        assert_eq!(profile.current_campaign(), "dunes");
        assert_eq!(final_state(&Ok(loaded)), CampaignLoadState::Loaded);
    }

    #[test]
    fn test_fallback_rewrites_selection() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        let registry = Registry::open(layout).unwrap();
        let loader = CampaignLoader::new(&registry);
        let mut profile = InMemoryProfile::new("ana").with_campaign("missing");

        let loaded = loader.load_selected(&mut profile).unwrap();

        assert_eq!(
            loaded.states,
            [
                CampaignLoadState::Selected,
                CampaignLoadState::Fallback,
                CampaignLoadState::Loaded
            ]
        );
        assert_eq!(loaded.campaign.name, "lugaru");
        assert_eq!(profile.current_campaign(), "lugaru");
    }

    #[test]
    fn test_malformed_campaign_falls_back() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        write(&layout.base_dir.join("Campaigns/broken.json"), "{ nope");
        let registry = Registry::open(layout).unwrap();
        let mut profile = InMemoryProfile::new("ana");

        let loaded = CampaignLoader::new(&registry)
            .load_campaign("broken", &mut profile)
            .unwrap();
        assert!(loaded.fell_back());
        assert_eq!(loaded.campaign.name, "lugaru");
    }

    #[test]
    fn test_no_campaign_at_all_fails() {
        let (_temp, layout) = setup();
        let registry = Registry::open(layout).unwrap();
        let loader = CampaignLoader::new(&registry);
        let mut profile = InMemoryProfile::new("ana");

        let result = loader.load_campaign("dunes", &mut profile);
        assert_eq!(final_state(&result), CampaignLoadState::Failed);
        match result.unwrap_err() {
            CampaignError::FallbackExhausted {
                requested, default, ..
            } => {
                assert_eq!(requested, "dunes");
                assert_eq!(default, "lugaru");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = loader.load_campaign("lugaru", &mut profile).unwrap_err();
        assert!(matches!(err, CampaignError::FallbackExhausted { .. }));
    }

    #[test]
    fn test_custom_default_campaign() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        let registry = Registry::open(layout).unwrap();
        let loader = CampaignLoader::new(&registry).with_default_campaign("lugaru");
        let mut profile = InMemoryProfile::new("ana");

        let loaded = loader.load_campaign("nope", &mut profile).unwrap();
        assert_eq!(loaded.campaign.name, "lugaru");
        assert_eq!(profile.current_campaign(), "lugaru");
    }

    #[test]
    fn test_mod_campaign_and_listing() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        write(&layout.base_dir.join("Campaigns/notes.txt"), "ignored");
        write(&layout.mods_dir.join("Dunes/campaigns/dunes.JSON"), SIMPLE);
        write(&layout.mods_dir.join("Dunes/campaigns/lugaru.json"), SIMPLE);
        write(&layout.texture_packs_dir.join("Snow/Campaigns/winter.json"), SIMPLE);
        let mut registry = Registry::open(layout).unwrap();

        // Available mods contribute nothing.
        assert_eq!(
            CampaignLoader::new(&registry).list_campaigns(),
            ["lugaru", "winter"]
        );

        registry.begin_edit();
        registry.move_package("Dunes", PendingSet::Available, PendingSet::Enabled);
        registry.apply(&|| {}).unwrap();

        let loader = CampaignLoader::new(&registry);
        assert_eq!(loader.list_campaigns(), ["lugaru", "winter", "dunes"]);

        let mut profile = InMemoryProfile::new("ana");
        let loaded = loader.load_campaign("dunes", &mut profile).unwrap();
        assert!(!loaded.fell_back());
    }

    #[test]
    fn test_world_image_fallbacks() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        write(&layout.base_dir.join("Campaigns/dunes.json"), SIMPLE);
        write(&layout.base_dir.join("Campaigns/bare.json"), SIMPLE);
        write(&layout.base_dir.join("Textures/dunes/World.png"), "dunes");
        let registry = Registry::open(layout.clone()).unwrap();
        let loader = CampaignLoader::new(&registry);

        let dunes = loader.read_campaign("dunes").unwrap();
        assert_eq!(
            dunes.world_image,
            Some(layout.base_dir.join("Textures/dunes/World.png"))
        );

        let bare = loader.read_campaign("bare").unwrap();
        assert!(bare.world_image.is_none());

        write(&layout.base_dir.join("Textures/World.png"), "base");
        let bare = loader.read_campaign("bare").unwrap();
        assert_eq!(
            bare.world_image,
            Some(layout.base_dir.join("Textures/World.png"))
        );
    }

    #[test]
    fn test_progress_reset_only_without_choices() {
        let (_temp, layout) = setup();
        write(&layout.base_dir.join("Campaigns/lugaru.json"), SIMPLE);
        let registry = Registry::open(layout).unwrap();
        let loader = CampaignLoader::new(&registry);

        let mut fresh = InMemoryProfile::new("ana");
        fresh.progress_mut("lugaru").score = 50;
        loader.load_campaign("lugaru", &mut fresh).unwrap();
        assert_eq!(fresh.progress("lugaru").unwrap().score, 0);

        let mut veteran = InMemoryProfile::new("bo");
        let progress = veteran.progress_mut("lugaru");
        progress.score = 50;
        progress.choices_made = 4;
        loader.load_campaign("lugaru", &mut veteran).unwrap();
        assert_eq!(veteran.progress("lugaru").unwrap().score, 50);
    }

    #[test]
    fn test_invalid_names_not_found() {
        let (_temp, layout) = setup();
        let registry = Registry::open(layout).unwrap();
        let loader = CampaignLoader::new(&registry);

        assert!(matches!(
            loader.read_campaign("../lugaru"),
            Err(CampaignError::NotFound { .. })
        ));
        assert!(matches!(
            loader.read_campaign(""),
            Err(CampaignError::NotFound { .. })
        ));
    }
}
