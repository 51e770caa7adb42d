//! Client configuration
//!
//! ```yaml
//! director_id: 2f9f1a52-4b1a-4bd6-a4cc-0e1e2f1f2c3d
//! stemcell_api_version: 2
//! ```

use crate::error::{CloudError, Result};
use crate::negotiator::{DEFAULT_API_VERSION, MAX_SUPPORTED_API_VERSION};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_api_version() -> u32 {
    DEFAULT_API_VERSION
}

/// Settings the CPI client is constructed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Director identity sent in every request context
    pub director_id: String,

    /// Highest stemcell/CPI API version to use
    #[serde(default = "default_api_version")]
    pub stemcell_api_version: u32,
}

impl CloudConfig {
    pub fn new(director_id: impl Into<String>, stemcell_api_version: u32) -> Self {
        Self {
            director_id: director_id.into(),
            stemcell_api_version,
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: CloudConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded CPI client config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.director_id.trim().is_empty() {
            return Err(CloudError::InvalidConfig(
                "director_id must not be empty".to_string(),
            ));
        }

        if self.stemcell_api_version == 0 {
            return Err(CloudError::InvalidConfig(
                "stemcell_api_version must be at least 1".to_string(),
            ));
        }

        if self.stemcell_api_version > MAX_SUPPORTED_API_VERSION {
            tracing::warn!(
                "stemcell_api_version {} exceeds supported version {}; results will be read as version {}",
                self.stemcell_api_version,
                MAX_SUPPORTED_API_VERSION,
                MAX_SUPPORTED_API_VERSION
            );
        }

        Ok(())
    }
}
