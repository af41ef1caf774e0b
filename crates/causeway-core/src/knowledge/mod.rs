//! Background knowledge: tiers plus explicit forbidden and required edges.
//!
//! Knowledge is a plain value. The engine clones it at search start, so edits
//! made by one caller never leak into a search that is already running.

pub mod conflict;
pub mod file;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::KnowledgeError;
use crate::models::Node;

pub use conflict::{ConflictReason, KnowledgeConflict};
use file::KnowledgeFile;

/// Tiering and forbidden/required edge constraints over ordered node pairs.
///
/// Tier order forbids "backward" edges: a node in a later tier may not
/// cause a node in an earlier tier. When an ordered pair is both required
/// and forbidden, required wins and the pair is reported by [`conflicts`].
///
/// [`conflicts`]: Knowledge::conflicts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KnowledgeFile", into = "KnowledgeFile")]
pub struct Knowledge {
    tiers: BTreeMap<String, usize>,
    forbidden_within: BTreeSet<usize>,
    forbidden: BTreeSet<(String, String)>,
    required: BTreeSet<(String, String)>,
    default_to_knowledge_layout: bool,
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the TOML knowledge format (see [`file`]).
    pub fn from_toml(content: &str) -> Result<Self, KnowledgeError> {
        toml::from_str(content).map_err(|e| KnowledgeError::Parse {
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String, KnowledgeError> {
        toml::to_string(self).map_err(|e| KnowledgeError::Parse {
            message: e.to_string(),
        })
    }

    // --- Editing ---

    /// Place `name` in `tier`, moving it out of any earlier tier.
    pub fn add_to_tier(&mut self, tier: usize, name: impl Into<String>) -> &mut Self {
        self.tiers.insert(name.into(), tier);
        self
    }

    pub fn remove_from_tiers(&mut self, name: &str) -> &mut Self {
        self.tiers.remove(name);
        self
    }

    /// Forbid every edge between two nodes of the same tier.
    pub fn set_tier_forbidden_within(&mut self, tier: usize, forbidden: bool) -> &mut Self {
        if forbidden {
            self.forbidden_within.insert(tier);
        } else {
            self.forbidden_within.remove(&tier);
        }
        self
    }

    pub fn set_forbidden(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.forbidden.insert((from.into(), to.into()));
        self
    }

    pub fn remove_forbidden(&mut self, from: &str, to: &str) -> &mut Self {
        self.forbidden.remove(&(from.to_string(), to.to_string()));
        self
    }

    pub fn set_required(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.required.insert((from.into(), to.into()));
        self
    }

    pub fn remove_required(&mut self, from: &str, to: &str) -> &mut Self {
        self.required.remove(&(from.to_string(), to.to_string()));
        self
    }

    pub fn set_default_to_knowledge_layout(&mut self, value: bool) -> &mut Self {
        self.default_to_knowledge_layout = value;
        self
    }

    // --- Queries ---

    /// Whether the edge `from --> to` is forbidden. A required edge is never
    /// reported as forbidden.
    pub fn is_forbidden(&self, from: &str, to: &str) -> bool {
        if self.is_required(from, to) {
            return false;
        }
        self.forbidden_reason(from, to).is_some()
    }

    pub fn is_required(&self, from: &str, to: &str) -> bool {
        self.required.contains(&(from.to_string(), to.to_string()))
    }

    /// Either direction required.
    pub fn is_required_either_way(&self, a: &str, b: &str) -> bool {
        self.is_required(a, b) || self.is_required(b, a)
    }

    pub fn tier_of(&self, name: &str) -> Option<usize> {
        self.tiers.get(name).copied()
    }

    pub fn is_tier_forbidden_within(&self, tier: usize) -> bool {
        self.forbidden_within.contains(&tier)
    }

    /// Only consumed by layout/presentation layers.
    pub fn is_default_to_knowledge_layout(&self) -> bool {
        self.default_to_knowledge_layout
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty() && self.forbidden.is_empty() && self.required.is_empty()
    }

    /// Number of tiers, i.e. one past the highest assigned tier.
    pub fn num_tiers(&self) -> usize {
        self.tiers.values().max().map_or(0, |t| t + 1)
    }

    /// Names assigned to `tier`, sorted.
    pub fn tier(&self, tier: usize) -> Vec<&str> {
        self.tiers
            .iter()
            .filter(|(_, &t)| t == tier)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn required_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.required.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn forbidden_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forbidden.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Required edges that some other constraint forbids.
    pub fn conflicts(&self) -> Vec<KnowledgeConflict> {
        self.required
            .iter()
            .filter_map(|(from, to)| {
                self.forbidden_reason(from, to)
                    .map(|reason| KnowledgeConflict::new(from, to, reason))
            })
            .collect()
    }

    /// Every node named by the knowledge must be one of `nodes`.
    pub fn validate_nodes(&self, nodes: &[Node]) -> Result<(), KnowledgeError> {
        let known: BTreeSet<&str> = nodes.iter().map(Node::name).collect();
        let referenced = self
            .tiers
            .keys()
            .chain(self.forbidden.iter().flat_map(|(a, b)| [a, b]))
            .chain(self.required.iter().flat_map(|(a, b)| [a, b]));
        for name in referenced {
            if !known.contains(name.as_str()) {
                return Err(KnowledgeError::UnknownNode { name: name.clone() });
            }
        }
        Ok(())
    }

    fn forbidden_reason(&self, from: &str, to: &str) -> Option<ConflictReason> {
        if self.forbidden.contains(&(from.to_string(), to.to_string())) {
            return Some(ConflictReason::ExplicitlyForbidden);
        }
        match (self.tier_of(from), self.tier_of(to)) {
            (Some(tf), Some(tt)) if tf > tt => Some(ConflictReason::TierOrder),
            (Some(tf), Some(tt)) if tf == tt && self.is_tier_forbidden_within(tf) => {
                Some(ConflictReason::WithinTier)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_tier_cannot_cause_earlier_tier() {
        let mut k = Knowledge::new();
        k.add_to_tier(0, "A").add_to_tier(1, "B");
        assert!(k.is_forbidden("B", "A"));
        assert!(!k.is_forbidden("A", "B"));
        assert!(!k.is_forbidden("A", "C"));
    }

    #[test]
    fn required_wins_over_forbidden() {
        let mut k = Knowledge::new();
        k.set_forbidden("A", "B").set_required("A", "B");
        assert!(!k.is_forbidden("A", "B"));
        assert_eq!(k.conflicts().len(), 1);
    }
}
