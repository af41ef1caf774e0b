use serde::{Deserialize, Serialize};

/// Why a required edge is also forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    ExplicitlyForbidden,
    TierOrder,
    WithinTier,
}

/// A required edge that another constraint forbids. Surfaced as a warning;
/// the required edge wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnowledgeConflict {
    pub from: String,
    pub to: String,
    pub reason: ConflictReason,
}

impl KnowledgeConflict {
    pub fn new(from: &str, to: &str, reason: ConflictReason) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for KnowledgeConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            ConflictReason::ExplicitlyForbidden => "explicitly forbidden",
            ConflictReason::TierOrder => "forbidden by tier order",
            ConflictReason::WithinTier => "forbidden within tier",
        };
        write!(f, "{} --> {} is required but {}", self.from, self.to, reason)
    }
}
