//! Governance configuration.
//!
//! Loaded from TOML; every key is optional and falls back to its default.

use std::path::Path;

use charity_types::{Address, Amount, BlockHeight};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Governance configuration.
///
/// Defaults accept every proposal the treasury can cover; the proposal
/// limits below only apply once a host tightens them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Smallest accepted donation. Zero donations are always rejected.
    /// Kept at 64 bits because TOML integers are signed 64-bit.
    pub min_donation: u64,
    /// Shortest voting window a proposal may request, in blocks
    pub min_voting_duration: BlockHeight,
    /// Longest voting window a proposal may request, in blocks; unbounded when unset
    pub max_voting_duration: Option<BlockHeight>,
    /// Maximum description length in bytes; unbounded when unset
    pub max_description_len: Option<usize>,
    /// Refuse proposals requesting nothing
    pub reject_zero_amount: bool,
    /// Refuse proposals with a blank description
    pub require_description: bool,
    /// Account the payment collaborator debits on execution
    pub treasury_address: Address,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            min_donation: 1,
            min_voting_duration: 0,
            max_voting_duration: None,
            max_description_len: None,
            reject_zero_amount: false,
            require_description: false,
            treasury_address: Address::ZERO,
        }
    }
}

impl GovernanceConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GovernanceConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max) = self.max_voting_duration {
            if self.min_voting_duration > max {
                return Err(ConfigError::Invalid(format!(
                    "min_voting_duration {} exceeds max_voting_duration {}",
                    self.min_voting_duration, max
                )));
            }
        }

        if self.max_description_len == Some(0) {
            return Err(ConfigError::Invalid(
                "max_description_len cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a requested voting window is within the configured bounds.
    pub fn allows_duration(&self, duration: BlockHeight) -> bool {
        duration >= self.min_voting_duration
            && self.max_voting_duration.map_or(true, |max| duration <= max)
    }

    /// Whether a description fits the configured length limit.
    pub fn allows_description_len(&self, len: usize) -> bool {
        self.max_description_len.map_or(true, |max| len <= max)
    }

    /// Effective donation floor.
    pub fn donation_floor(&self) -> Amount {
        Amount::from(self.min_donation.max(1))
    }
}
