//! On-disk knowledge format.
//!
//! ```toml
//! default_to_knowledge_layout = false
//!
//! [[tiers]]
//! nodes = ["age", "sex"]
//!
//! [[tiers]]
//! nodes = ["smoking", "diet"]
//! forbidden_within = true
//!
//! [[forbidden]]
//! from = "cancer"
//! to = "smoking"
//!
//! [[required]]
//! from = "smoking"
//! to = "cancer"
//! ```
//!
//! Tier numbers are the positions in the `tiers` array.

use serde::{Deserialize, Serialize};

use super::Knowledge;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnowledgeFile {
    pub default_to_knowledge_layout: bool,
    pub tiers: Vec<TierSpec>,
    pub forbidden: Vec<EdgeSpec>,
    pub required: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierSpec {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub forbidden_within: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
}

impl From<KnowledgeFile> for Knowledge {
    fn from(file: KnowledgeFile) -> Self {
        let mut knowledge = Knowledge::new();
        knowledge.set_default_to_knowledge_layout(file.default_to_knowledge_layout);
        for (tier, spec) in file.tiers.into_iter().enumerate() {
            for name in spec.nodes {
                knowledge.add_to_tier(tier, name);
            }
            knowledge.set_tier_forbidden_within(tier, spec.forbidden_within);
        }
        for edge in file.forbidden {
            knowledge.set_forbidden(edge.from, edge.to);
        }
        for edge in file.required {
            knowledge.set_required(edge.from, edge.to);
        }
        knowledge
    }
}

impl From<Knowledge> for KnowledgeFile {
    fn from(knowledge: Knowledge) -> Self {
        let tiers = (0..knowledge.num_tiers())
            .map(|tier| TierSpec {
                nodes: knowledge.tier(tier).into_iter().map(String::from).collect(),
                forbidden_within: knowledge.is_tier_forbidden_within(tier),
            })
            .collect();
        Self {
            default_to_knowledge_layout: knowledge.is_default_to_knowledge_layout(),
            tiers,
            forbidden: edge_specs(knowledge.forbidden_edges()),
            required: edge_specs(knowledge.required_edges()),
        }
    }
}

fn edge_specs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<EdgeSpec> {
    pairs
        .map(|(from, to)| EdgeSpec {
            from: from.to_string(),
            to: to.to_string(),
        })
        .collect()
}
