use causeway_core::AlgorithmId;
use tracing::info;

use super::{SearchAlgorithm, SearchOutcome, SearchRequest};
use crate::adjacency::SearchStatus;
use crate::error::SearchResult;
use crate::fci::{FciOrienter, FciReport, PossibleDsepSearch};

/// FCI: adjacency search, optional possible-d-sep removal, then PAG
/// orientation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fci;

impl SearchAlgorithm for Fci {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Fci
    }

    fn search(&self, request: &SearchRequest<'_>) -> SearchResult<SearchOutcome> {
        let adjacency = request
            .adjacency_search(request.config.adjacency_mode)
            .search(request.nodes)?;
        let mut outcome = SearchOutcome::from_adjacency(self.id(), adjacency);
        if outcome.is_canceled() {
            info!(algorithm = %self.id(), "search canceled, returning unoriented skeleton");
            return Ok(outcome);
        }

        let orienter = FciOrienter::from_config(request.knowledge, request.config);
        let mut removed = 0;
        if request.config.possible_dsep {
            let mut scratch = FciReport::default();
            orienter.orient_colliders(&mut outcome.graph, &outcome.sepsets, &mut scratch);
            let mut stage = PossibleDsepSearch::new(
                request.oracle,
                request.knowledge,
                request.config.depth_bound(),
                request.config.path_length_bound(),
            );
            if let Some(token) = request.cancel {
                stage = stage.with_cancellation(token);
            }
            let result = stage.run(&mut outcome.graph, &mut outcome.sepsets)?;
            outcome.tests_performed += result.tests;
            removed = result.removed;
            if result.canceled {
                outcome.status = SearchStatus::Canceled;
                return Ok(outcome);
            }
        }

        let mut report = orienter.orient(&mut outcome.graph, &outcome.sepsets);
        report.possible_dsep_removed = removed;
        outcome.fci = Some(report);
        Ok(outcome)
    }
}
