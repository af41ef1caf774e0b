//! Search configuration shared by every algorithm.
//!
//! # Examples
//!
//! ```
//! use causeway_core::config::{AdjacencyMode, SearchConfig};
//!
//! let config = SearchConfig::default();
//! assert_eq!(config.max_depth, -1);
//! assert_eq!(config.adjacency_mode, AdjacencyMode::Stable);
//! assert_eq!(config.depth_bound(), None);
//! ```

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// How neighbor sets are read during the adjacency search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyMode {
    /// Neighbor sets frozen at the start of each depth; order-independent.
    #[default]
    Stable,
    /// Live neighbor sets in node-list order; order-dependent.
    Legacy,
}

/// How unshielded triples are classified as colliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderDiscovery {
    /// Use the sepset recorded by the adjacency search.
    #[default]
    FirstSepset,
    /// Re-query every candidate sepset; mixed answers leave the triple ambiguous.
    Conservative,
}

/// What to do when a collider wants an arrowhead where the edge already
/// carries the opposite arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderConflictRule {
    /// Keep the earlier orientation and skip the new arrowhead.
    #[default]
    PrioritizeExisting,
    /// Keep both arrowheads (X <-> Y).
    OrientBidirected,
    /// Replace the earlier orientation.
    Overwrite,
}

/// Configuration for one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Largest conditioning-set size tried. -1 = unbounded. Default: -1.
    pub max_depth: i64,
    /// Stable (frozen neighbor sets) or legacy adjacency search. Default: stable.
    /// PC and PC-Stable pin this to legacy and stable respectively.
    pub adjacency_mode: AdjacencyMode,
    /// Evaluate each stable depth level on the rayon pool. Default: false.
    pub parallel: bool,
    /// Skip orientations that would close a directed cycle. Default: false.
    pub prevent_cycles: bool,
    /// Collider classification. Default: first_sepset. CPC forces conservative.
    pub collider_discovery: ColliderDiscovery,
    /// Collider arrowhead conflicts. Default: prioritize_existing.
    pub collider_conflict: ColliderConflictRule,
    /// FCI only: run the possible-d-sep stage. Default: true.
    pub possible_dsep: bool,
    /// FCI only: path length bound. -1 = unbounded. Default: -1.
    pub max_path_length: i64,
    /// Treat required/forbidden conflicts as errors instead of warnings. Default: false.
    pub strict_knowledge: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: defaults::DEFAULT_MAX_DEPTH,
            adjacency_mode: AdjacencyMode::default(),
            parallel: defaults::DEFAULT_PARALLEL,
            prevent_cycles: defaults::DEFAULT_PREVENT_CYCLES,
            collider_discovery: ColliderDiscovery::default(),
            collider_conflict: ColliderConflictRule::default(),
            possible_dsep: defaults::DEFAULT_POSSIBLE_DSEP,
            max_path_length: defaults::DEFAULT_MAX_PATH_LENGTH,
            strict_knowledge: defaults::DEFAULT_STRICT_KNOWLEDGE,
        }
    }
}

impl SearchConfig {
    /// Parse from a TOML string; unknown keys are rejected.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no search can honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth < -1 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth".to_string(),
                message: format!("must be >= -1, got {}", self.max_depth),
            });
        }
        if self.max_path_length < -1 {
            return Err(ConfigError::InvalidValue {
                field: "max_path_length".to_string(),
                message: format!("must be >= -1, got {}", self.max_path_length),
            });
        }
        Ok(())
    }

    /// `max_depth` as an optional bound (`None` = unbounded).
    pub fn depth_bound(&self) -> Option<usize> {
        usize::try_from(self.max_depth).ok()
    }

    /// `max_path_length` as an optional bound (`None` = unbounded).
    pub fn path_length_bound(&self) -> Option<usize> {
        usize::try_from(self.max_path_length).ok()
    }

    pub fn with_max_depth(mut self, max_depth: i64) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_adjacency_mode(mut self, mode: AdjacencyMode) -> Self {
        self.adjacency_mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_prevent_cycles(mut self, prevent_cycles: bool) -> Self {
        self.prevent_cycles = prevent_cycles;
        self
    }
}
