//! Graph nodes: a unique name plus a category tag.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Category of a variable in a causal graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Measured,
    Latent,
    Error,
    Selection,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Measured => "measured",
            Self::Latent => "latent",
            Self::Error => "error",
            Self::Selection => "selection",
        }
    }
}

/// A variable in the search. Identity is the name; two nodes with the same
/// name are the same node regardless of their category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    name: String,
    #[serde(default)]
    node_type: NodeType,
}

impl Node {
    /// A measured node.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, NodeType::Measured)
    }

    pub fn latent(name: impl Into<String>) -> Self {
        Self::with_type(name, NodeType::Latent)
    }

    pub fn with_type(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn is_measured(&self) -> bool {
        self.node_type == NodeType::Measured
    }

    /// Convenience for tests and callers: measured nodes from names.
    pub fn measured<I, S>(names: I) -> Vec<Node>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Node::new).collect()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_category() {
        let measured = Node::new("L");
        let latent = Node::latent("L");
        assert!(measured.is_measured());
        assert!(!latent.is_measured());
        assert_eq!(latent.node_type(), NodeType::Latent);
        assert_eq!(measured, latent);
    }
}
