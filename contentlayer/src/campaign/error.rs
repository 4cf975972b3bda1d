//! Campaign loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for campaign operations.
pub type CampaignResult<T> = Result<T, CampaignError>;

/// Why a descriptor document is unusable as a whole.
///
/// Problems inside a single level are not errors; the level is skipped.
#[derive(Debug, Error)]
pub enum CampaignParseError {
    #[error("descriptor is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("descriptor root must be an object")]
    NotAnObject,

    #[error("descriptor has no \"Levels\" array")]
    MissingLevels,
}

/// Errors that can occur while loading a campaign.
///
/// Only [`CampaignError::FallbackExhausted`] escapes
/// [`CampaignLoader::load_campaign`](super::CampaignLoader::load_campaign);
/// the other variants describe why a single attempt failed and are carried
/// as its `reason`.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// No descriptor for the campaign could be resolved.
    #[error("campaign \"{name}\" not found")]
    NotFound { name: String },

    /// The descriptor was found but could not be read.
    #[error("failed to read campaign descriptor {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not a usable campaign document.
    #[error("malformed campaign descriptor {}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        reason: CampaignParseError,
    },

    /// Neither the requested campaign nor the default could be loaded.
    #[error("could not load campaign \"{requested}\" or default campaign \"{default}\": {reason}")]
    FallbackExhausted {
        requested: String,
        default: String,
        #[source]
        reason: Box<CampaignError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_exhausted_carries_reason() {
        let err = CampaignError::FallbackExhausted {
            requested: "dunes".to_string(),
            default: "lugaru".to_string(),
            reason: Box::new(CampaignError::NotFound {
                name: "lugaru".to_string(),
            }),
        };

        let message = err.to_string();
        assert!(message.contains("\"dunes\""));
        assert!(message.contains("\"lugaru\" not found"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_malformed_carries_parse_error() {
        let err = CampaignError::Malformed {
            path: PathBuf::from("Campaigns/lugaru.json"),
            reason: CampaignParseError::MissingLevels,
        };

        assert!(err.to_string().contains("no \"Levels\" array"));
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<CampaignParseError>().is_some());
    }
}
