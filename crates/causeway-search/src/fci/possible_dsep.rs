//! Possible-D-Sep stage: a second round of edge removal that conditions on
//! nodes reachable over collider or triangle paths, not only neighbors.

use std::collections::{BTreeSet, HashSet, VecDeque};

use causeway_core::{Cancellable, CancellationToken, IndependenceOracle, Knowledge, Node};
use petgraph::stable_graph::NodeIndex;
use tracing::debug;

use crate::combinations::ChoiceGenerator;
use crate::error::{PartialSkeleton, SearchError, SearchResult};
use crate::graph::Graph;
use crate::sepset::SepsetMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PossibleDsepOutcome {
    pub removed: usize,
    pub tests: usize,
    pub canceled: bool,
}

/// Nodes `v` reachable from `x` along a path on which every inner node `b`,
/// between `a` and `c`, is a definite collider `a *-> b <-* c` or has `a`
/// and `c` adjacent. `max_path_length` bounds the number of edges.
pub fn possible_dsep(graph: &Graph, x: NodeIndex, max_path_length: Option<usize>) -> BTreeSet<NodeIndex> {
    let mut reached = BTreeSet::new();
    let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    let mut queue = VecDeque::new();
    for b in graph.adjacent_nodes(x) {
        reached.insert(b);
        seen.insert((x, b));
        queue.push_back((x, b, 1usize));
    }
    while let Some((a, b, length)) = queue.pop_front() {
        if max_path_length.is_some_and(|bound| length >= bound) {
            continue;
        }
        for c in graph.adjacent_nodes(b) {
            if c == a || c == x || seen.contains(&(b, c)) {
                continue;
            }
            if graph.is_def_collider(a, b, c) || graph.is_adjacent(a, c) {
                reached.insert(c);
                seen.insert((b, c));
                queue.push_back((b, c, length + 1));
            }
        }
    }
    reached.remove(&x);
    reached
}

pub struct PossibleDsepSearch<'a> {
    oracle: &'a dyn IndependenceOracle,
    knowledge: &'a Knowledge,
    depth_bound: Option<usize>,
    max_path_length: Option<usize>,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> PossibleDsepSearch<'a> {
    pub fn new(
        oracle: &'a dyn IndependenceOracle,
        knowledge: &'a Knowledge,
        depth_bound: Option<usize>,
        max_path_length: Option<usize>,
    ) -> Self {
        Self {
            oracle,
            knowledge,
            depth_bound,
            max_path_length,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// For each adjacent pair, test subsets (size ≥ 1) of Possible-D-Sep
    /// from either end. Separated pairs lose their edge and gain a sepset.
    pub fn run(&self, graph: &mut Graph, sepsets: &mut SepsetMap) -> SearchResult<PossibleDsepOutcome> {
        let mut outcome = PossibleDsepOutcome::default();
        for (a, b) in graph.edge_pairs() {
            let (an, bn) = (graph.node(a).clone(), graph.node(b).clone());
            if !graph.is_adjacent(a, b) || self.knowledge.is_required_either_way(an.name(), bn.name()) {
                continue;
            }
            for (x, y) in [(a, b), (b, a)] {
                let candidates: Vec<Node> = possible_dsep(graph, x, self.max_path_length)
                    .into_iter()
                    .filter(|&v| v != y)
                    .map(|v| graph.node(v).clone())
                    .collect();
                match self.separate(graph, sepsets, &an, &bn, &candidates, &mut outcome)? {
                    Some(sepset) => {
                        debug!(x = %an, y = %bn, size = sepset.len(), "removed by possible-d-sep");
                        graph.remove_edge(x, y);
                        sepsets.put(&an, &bn, sepset)?;
                        outcome.removed += 1;
                        break;
                    }
                    None if outcome.canceled => return Ok(outcome),
                    None => {}
                }
            }
        }
        Ok(outcome)
    }

    fn separate(
        &self,
        graph: &Graph,
        sepsets: &SepsetMap,
        x: &Node,
        y: &Node,
        candidates: &[Node],
        outcome: &mut PossibleDsepOutcome,
    ) -> SearchResult<Option<Vec<Node>>> {
        let max_size = self
            .depth_bound
            .map_or(candidates.len(), |d| d.min(candidates.len()));
        for size in 1..=max_size {
            for choice in ChoiceGenerator::new(candidates.len(), size) {
                if self.cancel.is_some_and(Cancellable::is_cancelled) {
                    outcome.canceled = true;
                    return Ok(None);
                }
                let z: Vec<Node> = choice.iter().map(|&i| candidates[i].clone()).collect();
                outcome.tests += 1;
                let result = self.oracle.test(x, y, &z).map_err(|failure| SearchError::Oracle {
                    x: x.name().to_string(),
                    y: y.name().to_string(),
                    conditioning: z.iter().map(|n| n.name().to_string()).collect(),
                    message: failure.message,
                    partial: Box::new(PartialSkeleton {
                        graph: graph.clone(),
                        sepsets: sepsets.clone(),
                    }),
                })?;
                if result.independent {
                    return Ok(Some(z));
                }
            }
        }
        Ok(None)
    }
}
