//! Facade: validate inputs, resolve the algorithm, run it.

use std::collections::HashSet;
use std::time::Instant;

use causeway_core::{AlgorithmId, CausewayConfig, Knowledge};
use tracing::{info, warn};

use crate::algorithms::{AlgorithmRegistry, SearchOutcome, SearchRequest};
use crate::error::{SearchError, SearchResult};

/// Runs registered algorithms.
///
/// Every check that can fail happens before the first oracle call. The
/// knowledge is cloned at the start of each run, so later edits by the
/// caller never reach a search in progress.
#[derive(Debug)]
pub struct SearchEngine {
    registry: AlgorithmRegistry,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// An engine over the built-in algorithms.
    pub fn new() -> Self {
        Self::with_registry(AlgorithmRegistry::with_defaults())
    }

    pub fn with_registry(registry: AlgorithmRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AlgorithmRegistry {
        &mut self.registry
    }

    /// Run `algorithm` on `request`.
    pub fn run(
        &self,
        algorithm: AlgorithmId,
        request: &SearchRequest<'_>,
    ) -> SearchResult<SearchOutcome> {
        request.config.validate()?;
        check_unique_names(request)?;
        request.knowledge.validate_nodes(request.nodes)?;

        let conflicts = request.knowledge.conflicts();
        if !conflicts.is_empty() {
            if request.config.strict_knowledge {
                return Err(SearchError::KnowledgeConflict { conflicts });
            }
            for conflict in &conflicts {
                warn!(from = %conflict.from, to = %conflict.to, "{conflict}; required wins");
            }
        }

        let implementation = self.registry.get(algorithm)?;
        let knowledge: Knowledge = request.knowledge.clone();
        let request = SearchRequest {
            knowledge: &knowledge,
            ..*request
        };

        let started = Instant::now();
        info!(
            %algorithm,
            nodes = request.nodes.len(),
            oracle = request.oracle.name(),
            "search starting"
        );
        let mut outcome = implementation.search(&request)?;
        outcome.knowledge_warnings = conflicts;
        info!(
            %algorithm,
            status = ?outcome.status,
            edges = outcome.graph.edge_count(),
            tests = outcome.tests_performed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        Ok(outcome)
    }

    /// Run with the algorithm and search settings of a loaded config file.
    /// The request's own `config` is replaced by `config.search`.
    pub fn run_configured(
        &self,
        config: &CausewayConfig,
        request: &SearchRequest<'_>,
    ) -> SearchResult<SearchOutcome> {
        let request = SearchRequest {
            config: &config.search,
            ..*request
        };
        self.run(config.algorithm, &request)
    }
}

fn check_unique_names(request: &SearchRequest<'_>) -> SearchResult<()> {
    let mut seen = HashSet::new();
    for node in request.nodes {
        if !seen.insert(node.name()) {
            return Err(SearchError::invalid(
                "nodes",
                format!("duplicate node name {}", node.name()),
            ));
        }
    }
    Ok(())
}
