use causeway_core::config::AdjacencyMode;
use causeway_core::AlgorithmId;

use super::{pc_family_search, SearchAlgorithm, SearchOutcome, SearchRequest};
use crate::error::SearchResult;

/// PC with the original order-dependent adjacency search.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pc;

impl SearchAlgorithm for Pc {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Pc
    }

    fn search(&self, request: &SearchRequest<'_>) -> SearchResult<SearchOutcome> {
        pc_family_search(
            self.id(),
            request,
            AdjacencyMode::Legacy,
            request.config.collider_discovery,
        )
    }
}

/// PC with frozen per-depth neighbor sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct PcStable;

impl SearchAlgorithm for PcStable {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::PcStable
    }

    fn search(&self, request: &SearchRequest<'_>) -> SearchResult<SearchOutcome> {
        pc_family_search(
            self.id(),
            request,
            AdjacencyMode::Stable,
            request.config.collider_discovery,
        )
    }
}
