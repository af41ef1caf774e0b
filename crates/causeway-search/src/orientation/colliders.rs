//! Unshielded-collider classification.
//!
//! [`SepsetClassifier`] reads the sepset recorded during adjacency search.
//! [`ConservativeClassifier`] re-queries the oracle over every candidate
//! conditioning set and only commits when all of them agree.

use std::cell::Cell;

use causeway_core::{Cancellable, CancellationToken, IndependenceOracle, Node};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::combinations::DepthChoiceGenerator;
use crate::error::{PartialSkeleton, SearchError, SearchResult};
use crate::graph::Graph;
use crate::sepset::SepsetMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripleStatus {
    Collider,
    NonCollider,
    /// Separating sets disagree about the middle node.
    Ambiguous,
    /// Nothing recorded; leave unoriented.
    Unknown,
}

/// Decides whether the unshielded triple `x - y - z` is a collider.
pub trait TripleClassifier {
    fn classify(
        &self,
        graph: &Graph,
        sepsets: &SepsetMap,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
    ) -> SearchResult<TripleStatus>;
}

/// Collider iff `y` is outside the first-found sepset of `(x, z)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SepsetClassifier;

impl TripleClassifier for SepsetClassifier {
    fn classify(
        &self,
        graph: &Graph,
        sepsets: &SepsetMap,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
    ) -> SearchResult<TripleStatus> {
        let status = sepsets.collider_status(graph.node(x), graph.node(y), graph.node(z));
        Ok(match status {
            Some(true) => TripleStatus::Collider,
            Some(false) => TripleStatus::NonCollider,
            None => TripleStatus::Unknown,
        })
    }
}

/// Conservative (CPC) classification.
///
/// Tests `x _||_ z | S` for every `S` of size up to the depth bound drawn
/// from `adj(x) \ {z}` and `adj(z) \ {x}`. `y` in no separating set gives a
/// collider, `y` in all of them a non-collider, anything else is ambiguous.
pub struct ConservativeClassifier<'a> {
    oracle: &'a dyn IndependenceOracle,
    max_depth: i64,
    cancel: Option<&'a CancellationToken>,
    interrupted: Cell<bool>,
    tests: Cell<usize>,
}

impl<'a> ConservativeClassifier<'a> {
    pub fn new(oracle: &'a dyn IndependenceOracle, max_depth: i64) -> Self {
        Self {
            oracle,
            max_depth,
            cancel: None,
            interrupted: Cell::new(false),
            tests: Cell::new(0),
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set once a classification stopped early on cancellation. Triples
    /// seen after that are reported `Unknown`.
    pub fn was_interrupted(&self) -> bool {
        self.interrupted.get()
    }

    pub fn tests_performed(&self) -> usize {
        self.tests.get()
    }

    /// All conditioning sets that separate `x` and `z`.
    fn separating_sets(
        &self,
        graph: &Graph,
        sepsets: &SepsetMap,
        x: NodeIndex,
        z: NodeIndex,
    ) -> SearchResult<Option<Vec<Vec<Node>>>> {
        let (xn, zn) = (graph.node(x), graph.node(z));
        let sources = [neighbors_except(graph, x, z), neighbors_except(graph, z, x)];
        let mut found = Vec::new();
        for (i, source) in sources.iter().enumerate() {
            for choice in DepthChoiceGenerator::new(source.len() as i64, self.max_depth)? {
                let set: Vec<Node> = choice.iter().map(|&c| source[c].clone()).collect();
                if i > 0 && set.iter().all(|n| sources[0].contains(n)) {
                    continue;
                }
                if self.cancel.is_some_and(Cancellable::is_cancelled) {
                    self.interrupted.set(true);
                    return Ok(None);
                }
                self.tests.set(self.tests.get() + 1);
                let result = self.oracle.test(xn, zn, &set).map_err(|failure| {
                    SearchError::Oracle {
                        x: xn.name().to_string(),
                        y: zn.name().to_string(),
                        conditioning: set.iter().map(|n| n.name().to_string()).collect(),
                        message: failure.message,
                        partial: Box::new(PartialSkeleton {
                            graph: graph.clone(),
                            sepsets: sepsets.clone(),
                        }),
                    }
                })?;
                if result.independent {
                    found.push(set);
                }
            }
        }
        Ok(Some(found))
    }
}

impl TripleClassifier for ConservativeClassifier<'_> {
    fn classify(
        &self,
        graph: &Graph,
        sepsets: &SepsetMap,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
    ) -> SearchResult<TripleStatus> {
        if self.interrupted.get() {
            return Ok(TripleStatus::Unknown);
        }
        let Some(sets) = self.separating_sets(graph, sepsets, x, z)? else {
            return Ok(TripleStatus::Unknown);
        };
        if sets.is_empty() {
            return Ok(TripleStatus::Ambiguous);
        }
        let yn = graph.node(y);
        let containing = sets.iter().filter(|s| s.contains(yn)).count();
        Ok(if containing == 0 {
            TripleStatus::Collider
        } else if containing == sets.len() {
            TripleStatus::NonCollider
        } else {
            TripleStatus::Ambiguous
        })
    }
}

fn neighbors_except(graph: &Graph, x: NodeIndex, y: NodeIndex) -> Vec<Node> {
    graph
        .adjacent_nodes(x)
        .into_iter()
        .filter(|&n| n != y)
        .map(|n| graph.node(n).clone())
        .collect()
}
