//! The built-in searches and the table that resolves them by id.

mod cpc;
mod fci;
mod pc;
mod registry;

use std::collections::BTreeSet;

use causeway_core::config::{AdjacencyMode, ColliderDiscovery};
use causeway_core::{
    AlgorithmId, CancellationToken, IndependenceOracle, Knowledge, KnowledgeConflict, Node,
    SearchConfig,
};
use serde::Serialize;

pub use self::cpc::Cpc;
pub use self::fci::Fci;
pub use self::pc::{Pc, PcStable};
pub use self::registry::AlgorithmRegistry;
use crate::adjacency::{AdjacencyOutcome, AdjacencySearch, SearchStatus};
use crate::error::SearchResult;
use crate::fci::FciReport;
use crate::graph::Graph;
use crate::orientation::{ConservativeClassifier, OrientationEngine, OrientationReport};
use crate::sepset::SepsetMap;

/// Everything one search invocation reads. All borrowed; nothing here is
/// mutated by the search.
#[derive(Clone, Copy)]
pub struct SearchRequest<'a> {
    pub nodes: &'a [Node],
    pub oracle: &'a dyn IndependenceOracle,
    pub knowledge: &'a Knowledge,
    pub config: &'a SearchConfig,
    pub cancel: Option<&'a CancellationToken>,
    pub initial_graph: Option<&'a Graph>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(
        nodes: &'a [Node],
        oracle: &'a dyn IndependenceOracle,
        knowledge: &'a Knowledge,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            nodes,
            oracle,
            knowledge,
            config,
            cancel: None,
            initial_graph: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_initial_graph(mut self, graph: &'a Graph) -> Self {
        self.initial_graph = Some(graph);
        self
    }

    /// An adjacency search configured from this request.
    pub fn adjacency_search(&self, mode: AdjacencyMode) -> AdjacencySearch<'a> {
        let mut search =
            AdjacencySearch::new(self.oracle, self.knowledge, self.config).with_mode(mode);
        if let Some(token) = self.cancel {
            search = search.with_cancellation(token);
        }
        if let Some(graph) = self.initial_graph {
            search = search.with_initial_graph(graph.clone());
        }
        search
    }
}

/// The result of a search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub algorithm: AlgorithmId,
    pub graph: Graph,
    pub sepsets: SepsetMap,
    pub status: SearchStatus,
    pub depth_reached: Option<usize>,
    pub tests_performed: usize,
    /// PC-family orientation summary. `None` when the search stopped before
    /// orientation or ran FCI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<OrientationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fci: Option<FciReport>,
    /// Required edges that knowledge also forbids. Required wins.
    pub knowledge_warnings: Vec<KnowledgeConflict>,
}

impl SearchOutcome {
    /// Bare skeleton outcome, before any orientation.
    pub(crate) fn from_adjacency(algorithm: AlgorithmId, adjacency: AdjacencyOutcome) -> Self {
        Self {
            algorithm,
            graph: adjacency.graph,
            sepsets: adjacency.sepsets,
            status: adjacency.status,
            depth_reached: adjacency.depth_reached,
            tests_performed: adjacency.tests_performed,
            orientation: None,
            fci: None,
            knowledge_warnings: Vec::new(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.status == SearchStatus::Canceled
    }

    /// Adjacent pairs by name, each pair sorted.
    pub fn adjacencies(&self) -> BTreeSet<(String, String)> {
        self.graph.adjacency_set()
    }

    /// Non-adjacent pairs by name, each pair sorted.
    pub fn non_adjacencies(&self) -> BTreeSet<(String, String)> {
        self.graph.non_adjacency_set()
    }
}

/// One search strategy behind a single capability.
pub trait SearchAlgorithm: Send + Sync {
    fn id(&self) -> AlgorithmId;

    fn search(&self, request: &SearchRequest<'_>) -> SearchResult<SearchOutcome>;
}

/// Adjacency search followed by Meek orientation. The shared body of PC,
/// PC-Stable and CPC.
pub(crate) fn pc_family_search(
    id: AlgorithmId,
    request: &SearchRequest<'_>,
    mode: AdjacencyMode,
    discovery: ColliderDiscovery,
) -> SearchResult<SearchOutcome> {
    let adjacency = request.adjacency_search(mode).search(request.nodes)?;
    let mut outcome = SearchOutcome::from_adjacency(id, adjacency);
    if outcome.is_canceled() {
        tracing::info!(algorithm = %id, "search canceled, returning unoriented skeleton");
        return Ok(outcome);
    }

    let engine = OrientationEngine::from_config(request.knowledge, request.config);
    let report = match discovery {
        ColliderDiscovery::FirstSepset => engine.orient(&mut outcome.graph, &outcome.sepsets),
        ColliderDiscovery::Conservative => {
            let mut classifier =
                ConservativeClassifier::new(request.oracle, request.config.max_depth);
            if let Some(token) = request.cancel {
                classifier = classifier.with_cancellation(token);
            }
            let report =
                engine.orient_with(&mut outcome.graph, &mut outcome.sepsets, &classifier)?;
            outcome.tests_performed += classifier.tests_performed();
            if classifier.was_interrupted() {
                outcome.status = SearchStatus::Canceled;
            }
            report
        }
    };
    outcome.orientation = Some(report);
    Ok(outcome)
}
