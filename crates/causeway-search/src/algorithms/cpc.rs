use causeway_core::config::ColliderDiscovery;
use causeway_core::AlgorithmId;

use super::{pc_family_search, SearchAlgorithm, SearchOutcome, SearchRequest};
use crate::error::SearchResult;

/// Conservative PC: colliders are only oriented when every separating set
/// agrees. Disagreements are recorded as ambiguous triples.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cpc;

impl SearchAlgorithm for Cpc {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Cpc
    }

    fn search(&self, request: &SearchRequest<'_>) -> SearchResult<SearchOutcome> {
        pc_family_search(
            self.id(),
            request,
            request.config.adjacency_mode,
            ColliderDiscovery::Conservative,
        )
    }
}
