//! Adjacency search: thin a complete (or supplied) graph to a skeleton.
//!
//! Depth `d` tests every adjacent pair against conditioning sets of size
//! `d` drawn from its neighbors. The first independent set removes the edge
//! and becomes the pair's sepset.
//!
//! Two modes:
//! - **Stable** freezes neighbor sets at the start of each depth, evaluates
//!   the whole level (optionally on the rayon pool) and only then commits
//!   removals. Pairs and neighbor sets are ordered by node name, so the
//!   skeleton and sepsets do not depend on node-list order.
//! - **Legacy** walks pairs in node-list order against the live graph and
//!   removes edges immediately. Results depend on node order.

mod level;

use causeway_core::config::AdjacencyMode;
use causeway_core::{Cancellable, CancellationToken, IndependenceOracle, Knowledge, Node, SearchConfig};
use petgraph::stable_graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use self::level::{evaluate, PairResult, PairTask, Verdict};
use crate::error::{PartialSkeleton, SearchError, SearchResult};
use crate::graph::{Endpoint, Graph};
use crate::sepset::SepsetMap;

/// How a search ended. Cancellation is a status, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Completed,
    Canceled,
}

/// Skeleton, sepsets and bookkeeping from one adjacency search.
#[derive(Debug, Clone)]
pub struct AdjacencyOutcome {
    pub graph: Graph,
    pub sepsets: SepsetMap,
    pub status: SearchStatus,
    /// Deepest level whose results are in `graph`. `None` if not even depth
    /// 0 was committed.
    pub depth_reached: Option<usize>,
    pub tests_performed: usize,
}

impl AdjacencyOutcome {
    pub fn is_canceled(&self) -> bool {
        self.status == SearchStatus::Canceled
    }
}

pub struct AdjacencySearch<'a> {
    oracle: &'a dyn IndependenceOracle,
    knowledge: &'a Knowledge,
    mode: AdjacencyMode,
    max_depth: i64,
    parallel: bool,
    cancel: Option<&'a CancellationToken>,
    initial_graph: Option<Graph>,
}

impl<'a> AdjacencySearch<'a> {
    pub fn new(
        oracle: &'a dyn IndependenceOracle,
        knowledge: &'a Knowledge,
        config: &SearchConfig,
    ) -> Self {
        Self {
            oracle,
            knowledge,
            mode: config.adjacency_mode,
            max_depth: config.max_depth,
            parallel: config.parallel,
            cancel: None,
            initial_graph: None,
        }
    }

    pub fn with_mode(mut self, mode: AdjacencyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Start from this graph's adjacencies instead of the complete graph.
    /// Nodes it does not share with the search's node list are ignored.
    pub fn with_initial_graph(mut self, graph: Graph) -> Self {
        self.initial_graph = Some(graph);
        self
    }

    pub fn mode(&self) -> AdjacencyMode {
        self.mode
    }

    /// Fails with `InvalidArgument` on a `max_depth` below -1 before any
    /// oracle call.
    pub fn search(&self, nodes: &[Node]) -> SearchResult<AdjacencyOutcome> {
        let depth_bound = self.depth_bound()?;
        let mut state = SearchState {
            graph: self.starting_graph(nodes)?,
            sepsets: SepsetMap::new(),
            tests: 0,
        };
        info!(
            oracle = self.oracle.name(),
            nodes = nodes.len(),
            edges = state.graph.edge_count(),
            mode = ?self.mode,
            "adjacency search starting"
        );

        self.remove_forbidden_pairs(&mut state)?;

        let mut depth_reached = None;
        let mut status = SearchStatus::Completed;
        let mut depth = 0;
        loop {
            if depth_bound.is_some_and(|bound| depth > bound) {
                break;
            }
            if self.is_cancelled() {
                status = SearchStatus::Canceled;
                break;
            }
            let before = state.graph.edge_count();
            let finished = match self.mode {
                AdjacencyMode::Stable => self.stable_level(&mut state, depth)?,
                AdjacencyMode::Legacy => self.legacy_level(&mut state, depth)?,
            };
            if !finished {
                status = SearchStatus::Canceled;
                break;
            }
            depth_reached = Some(depth);
            debug!(
                depth,
                removed = before - state.graph.edge_count(),
                remaining = state.graph.edge_count(),
                "depth complete"
            );
            if !has_neighbor_set_larger_than(&state.graph, depth) {
                break;
            }
            depth += 1;
        }

        info!(
            edges = state.graph.edge_count(),
            sepsets = state.sepsets.len(),
            tests = state.tests,
            ?status,
            "adjacency search finished"
        );
        Ok(AdjacencyOutcome {
            graph: state.graph,
            sepsets: state.sepsets,
            status,
            depth_reached,
            tests_performed: state.tests,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(Cancellable::is_cancelled)
    }

    /// `None` when unbounded.
    fn depth_bound(&self) -> SearchResult<Option<usize>> {
        match self.max_depth {
            -1 => Ok(None),
            depth => usize::try_from(depth).map(Some).map_err(|_| {
                SearchError::invalid("max_depth", format!("must be >= -1, got {depth}"))
            }),
        }
    }

    fn starting_graph(&self, nodes: &[Node]) -> SearchResult<Graph> {
        let Some(initial) = &self.initial_graph else {
            return Ok(Graph::complete(nodes, Endpoint::Tail));
        };
        let mut graph = Graph::from_nodes(nodes);
        for edge in initial.edges() {
            if let (Some(a), Some(b)) = (
                graph.index_of(edge.node1.name()),
                graph.index_of(edge.node2.name()),
            ) {
                if a != b && !graph.is_adjacent(a, b) {
                    graph.add_undirected_edge(a, b)?;
                }
            }
        }
        Ok(graph)
    }

    /// Pairs forbidden in both directions can never be adjacent. They leave
    /// with an empty sepset and no oracle call.
    fn remove_forbidden_pairs(&self, state: &mut SearchState) -> SearchResult<()> {
        if self.knowledge.is_empty() {
            return Ok(());
        }
        for (a, b) in state.graph.edge_pairs() {
            let (an, bn) = (state.graph.node(a).clone(), state.graph.node(b).clone());
            if self.knowledge.is_forbidden(an.name(), bn.name())
                && self.knowledge.is_forbidden(bn.name(), an.name())
            {
                state.graph.remove_edge(a, b);
                state.sepsets.put(&an, &bn, Vec::new())?;
                debug!(x = %an, y = %bn, "removed pair forbidden both ways");
            }
        }
        Ok(())
    }

    fn is_required(&self, graph: &Graph, x: NodeIndex, y: NodeIndex) -> bool {
        self.knowledge
            .is_required_either_way(graph.node(x).name(), graph.node(y).name())
    }

    /// One frozen level. Returns `Ok(false)` when canceled, in which case
    /// nothing from this level is committed.
    fn stable_level(&self, state: &mut SearchState, depth: usize) -> SearchResult<bool> {
        let graph = &state.graph;
        let tasks: Vec<PairTask> = canonical_pairs(graph)
            .into_iter()
            .filter(|&(x, y)| !self.is_required(graph, x, y))
            .filter_map(|(x, y)| {
                PairTask::new(
                    (x, graph.node(x).clone()),
                    (y, graph.node(y).clone()),
                    sorted_neighbors_except(graph, x, y),
                    sorted_neighbors_except(graph, y, x),
                    depth,
                )
            })
            .collect();
        debug!(depth, pairs = tasks.len(), parallel = self.parallel, "evaluating level");

        let results: Vec<PairResult> = if self.parallel {
            tasks
                .par_iter()
                .map(|task| evaluate(self.oracle, self.cancel, task, depth))
                .collect()
        } else {
            let mut results = Vec::with_capacity(tasks.len());
            for task in &tasks {
                let result = evaluate(self.oracle, self.cancel, task, depth);
                let stop = matches!(result.verdict, Verdict::Canceled | Verdict::Failed { .. });
                results.push(result);
                if stop {
                    break;
                }
            }
            results
        };

        state.tests += results.iter().map(|r| r.tests).sum::<usize>();

        // Failures take precedence over cancellation; both leave the graph
        // as of the previous level.
        if let Some((task, result)) = tasks
            .iter()
            .zip(&results)
            .find(|(_, r)| matches!(r.verdict, Verdict::Failed { .. }))
        {
            if let Verdict::Failed {
                conditioning,
                failure,
            } = &result.verdict
            {
                return Err(oracle_error(state, task, conditioning, &failure.message));
            }
        }
        if results.iter().any(|r| matches!(r.verdict, Verdict::Canceled)) {
            debug!(depth, "level interrupted, discarding buffered results");
            return Ok(false);
        }

        for (task, result) in tasks.iter().zip(results) {
            if let Verdict::Separated { sepset, p_value } = result.verdict {
                state.graph.remove_edge(task.x, task.y);
                state
                    .sepsets
                    .put_with_p_value(&task.x_node, &task.y_node, sepset, p_value)?;
            }
        }
        Ok(true)
    }

    /// One live level in node-list order. Returns `Ok(false)` when canceled;
    /// removals made so far stay in the graph.
    fn legacy_level(&self, state: &mut SearchState, depth: usize) -> SearchResult<bool> {
        let order = state.graph.node_indices().to_vec();
        for &x in &order {
            for y in state.graph.adjacent_nodes(x) {
                if state.graph.rank(y) < state.graph.rank(x)
                    || !state.graph.is_adjacent(x, y)
                    || self.is_required(&state.graph, x, y)
                {
                    continue;
                }
                let graph = &state.graph;
                let Some(task) = PairTask::new(
                    (x, graph.node(x).clone()),
                    (y, graph.node(y).clone()),
                    neighbors_except(graph, x, y),
                    neighbors_except(graph, y, x),
                    depth,
                ) else {
                    continue;
                };
                let result = evaluate(self.oracle, self.cancel, &task, depth);
                state.tests += result.tests;
                match result.verdict {
                    Verdict::Separated { sepset, p_value } => {
                        state.graph.remove_edge(x, y);
                        state
                            .sepsets
                            .put_with_p_value(&task.x_node, &task.y_node, sepset, p_value)?;
                    }
                    Verdict::Adjacent => {}
                    Verdict::Canceled => return Ok(false),
                    Verdict::Failed {
                        conditioning,
                        failure,
                    } => return Err(oracle_error(state, &task, &conditioning, &failure.message)),
                }
            }
        }
        Ok(true)
    }
}

struct SearchState {
    graph: Graph,
    sepsets: SepsetMap,
    tests: usize,
}

fn oracle_error(
    state: &SearchState,
    task: &PairTask,
    conditioning: &[Node],
    message: &str,
) -> SearchError {
    tracing::warn!(x = %task.x_node, y = %task.y_node, %message, "oracle failed, aborting search");
    SearchError::Oracle {
        x: task.x_node.name().to_string(),
        y: task.y_node.name().to_string(),
        conditioning: conditioning.iter().map(|n| n.name().to_string()).collect(),
        message: message.to_string(),
        partial: Box::new(PartialSkeleton {
            graph: state.graph.clone(),
            sepsets: state.sepsets.clone(),
        }),
    }
}

/// Adjacent pairs with the smaller name first, sorted by name.
fn canonical_pairs(graph: &Graph) -> Vec<(NodeIndex, NodeIndex)> {
    let mut pairs: Vec<(NodeIndex, NodeIndex)> = graph
        .edge_pairs()
        .into_iter()
        .map(|(a, b)| {
            if graph.node(a).name() <= graph.node(b).name() {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect();
    pairs.sort_by(|&(a1, b1), &(a2, b2)| {
        (graph.node(a1).name(), graph.node(b1).name())
            .cmp(&(graph.node(a2).name(), graph.node(b2).name()))
    });
    pairs
}

/// `adj(x) \ {y}` in insertion order.
fn neighbors_except(graph: &Graph, x: NodeIndex, y: NodeIndex) -> Vec<Node> {
    graph
        .adjacent_nodes(x)
        .into_iter()
        .filter(|&n| n != y)
        .map(|n| graph.node(n).clone())
        .collect()
}

/// `adj(x) \ {y}` sorted by name.
fn sorted_neighbors_except(graph: &Graph, x: NodeIndex, y: NodeIndex) -> Vec<Node> {
    let mut neighbors = neighbors_except(graph, x, y);
    neighbors.sort();
    neighbors
}

/// Whether some adjacent pair still has a neighbor set of at least
/// `depth + 1` nodes, i.e. whether the next depth can test anything.
fn has_neighbor_set_larger_than(graph: &Graph, depth: usize) -> bool {
    graph
        .node_indices()
        .iter()
        .any(|&n| graph.degree(n) > 0 && graph.degree(n) - 1 > depth)
}
