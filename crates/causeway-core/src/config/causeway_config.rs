//! Top-level causeway configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ObservabilityConfig, SearchConfig};
use crate::errors::ConfigError;
use crate::models::AlgorithmId;

/// Top-level configuration aggregating all sub-configs.
///
/// ```toml
/// algorithm = "fci"
///
/// [search]
/// max_depth = 3
/// prevent_cycles = true
///
/// [observability]
/// log_filter = "causeway_search=debug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CausewayConfig {
    pub algorithm: AlgorithmId,
    pub search: SearchConfig,
    pub observability: ObservabilityConfig,
}

impl CausewayConfig {
    /// Parse from a TOML string. Missing keys take their defaults; unknown
    /// keys are an error.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    /// Load from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.search.validate()?;
        Ok(config)
    }
}
