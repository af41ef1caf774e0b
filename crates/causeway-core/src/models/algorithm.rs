//! Closed set of search algorithms the engine knows how to run.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a registered search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmId {
    /// PC with the order-dependent legacy adjacency search.
    Pc,
    /// PC with frozen per-depth neighbor sets.
    #[default]
    PcStable,
    /// Conservative PC: colliders decided by re-querying every candidate sepset.
    Cpc,
    /// Fast Causal Inference: PAG output with circle endpoints.
    Fci,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 4] = [Self::Pc, Self::PcStable, Self::Cpc, Self::Fci];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::PcStable => "pc-stable",
            Self::Cpc => "cpc",
            Self::Fci => "fci",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

impl FromStr for AlgorithmId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_name(s).ok_or_else(|| format!("unknown algorithm '{s}'"))
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
