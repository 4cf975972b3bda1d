//! The player profile as seen by the campaign loader.

use std::collections::HashMap;

use crate::config::DEFAULT_CAMPAIGN;

/// Player state the loader reads and updates.
///
/// Implemented by the host's account store.
pub trait PlayerProfile {
    /// Campaign currently selected.
    fn current_campaign(&self) -> &str;

    /// Change the selected campaign.
    fn set_current_campaign(&mut self, name: &str);

    /// Choices the player has made in the selected campaign.
    fn campaign_choices_made(&self) -> usize;

    /// Reset the selected campaign's score and timer.
    fn reset_campaign_progress(&mut self);
}

/// Progress in one campaign.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignProgress {
    pub choices_made: usize,
    pub score: u32,
    pub fast_time: f32,
}

/// A [`PlayerProfile`] held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryProfile {
    name: String,
    current_campaign: String,
    progress: HashMap<String, CampaignProgress>,
}

impl InMemoryProfile {
    /// Profile with the default campaign selected and no progress.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_campaign: DEFAULT_CAMPAIGN.to_string(),
            progress: HashMap::new(),
        }
    }

    /// Select a campaign (builder pattern).
    pub fn with_campaign(mut self, campaign: impl Into<String>) -> Self {
        self.current_campaign = campaign.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Progress in `campaign`, if any was recorded.
    pub fn progress(&self, campaign: &str) -> Option<&CampaignProgress> {
        self.progress.get(campaign)
    }

    /// Mutable progress in `campaign`, created on first use.
    pub fn progress_mut(&mut self, campaign: &str) -> &mut CampaignProgress {
        self.progress.entry(campaign.to_string()).or_default()
    }
}

impl PlayerProfile for InMemoryProfile {
    fn current_campaign(&self) -> &str {
        &self.current_campaign
    }

    fn set_current_campaign(&mut self, name: &str) {
        self.current_campaign = name.to_string();
    }

    fn campaign_choices_made(&self) -> usize {
        self.progress(&self.current_campaign)
            .map_or(0, |p| p.choices_made)
    }

    fn reset_campaign_progress(&mut self) {
        let campaign = self.current_campaign.clone();
        let progress = self.progress_mut(&campaign);
        progress.score = 0;
        progress.fast_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile() {
        let profile = InMemoryProfile::new("ana");
        assert_eq!(profile.name(), "ana");
        assert_eq!(profile.current_campaign(), DEFAULT_CAMPAIGN);
        assert_eq!(profile.campaign_choices_made(), 0);
    }

    #[test]
    fn test_progress_is_per_campaign() {
        let mut profile = InMemoryProfile::new("ana").with_campaign("dunes");
        profile.progress_mut("dunes").choices_made = 3;

        assert_eq!(profile.campaign_choices_made(), 3);
        profile.set_current_campaign("lugaru");
        assert_eq!(profile.campaign_choices_made(), 0);
    }

    #[test]
    fn test_reset_keeps_choices() {
        let mut profile = InMemoryProfile::new("ana");
        let progress = profile.progress_mut(DEFAULT_CAMPAIGN);
        progress.choices_made = 2;
        progress.score = 900;
        progress.fast_time = 12.5;

        profile.reset_campaign_progress();

        let progress = profile.progress(DEFAULT_CAMPAIGN).unwrap();
        assert_eq!(progress.score, 0);
        assert_eq!(progress.fast_time, 0.0);
        assert_eq!(progress.choices_made, 2);
    }
}
