//! CLI error type.

use contentlayer::campaign::CampaignError;
use contentlayer::config::ConfigError;
use contentlayer::registry::RegistryError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be read, validated or written.
    Config(String),

    /// Registry load, scan or persist failed.
    Registry(RegistryError),

    /// Campaign could not be loaded, even after falling back.
    Campaign(CampaignError),

    /// A package id that the registry does not know.
    UnknownPackage(String),

    /// A package that is always enabled, such as the base game.
    NotToggleable(String),

    /// A content path that resolved to nothing.
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Registry(e) => write!(f, "Package registry error: {}", e),
            CliError::Campaign(e) => write!(f, "Campaign error: {}", e),
            CliError::UnknownPackage(id) => write!(
                f,
                "Unknown package '{}'. Use 'contentlayer packages list' to see installed packages.",
                id
            ),
            CliError::NotToggleable(id) => {
                write!(f, "Package '{}' is always enabled and cannot be toggled", id)
            }
            CliError::NotFound(path) => write!(f, "No content found for '{}'", path),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Registry(e) => Some(e),
            CliError::Campaign(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        CliError::Registry(e)
    }
}

impl From<CampaignError> for CliError {
    fn from(e: CampaignError) -> Self {
        CliError::Campaign(e)
    }
}
