//! FCI orientation: turns a skeleton into a partial ancestral graph.
//!
//! Every edge starts as `o-o`. Knowledge is applied, unshielded colliders
//! get arrowheads (R0), then R1-R4 run to a fixed point. Circle marks left
//! at the end are undetermined. R5-R10 are not applied.

pub mod possible_dsep;
mod rules;

use causeway_core::{Knowledge, SearchConfig};
use serde::Serialize;
use tracing::{debug, info};

pub use self::possible_dsep::{possible_dsep, PossibleDsepOutcome, PossibleDsepSearch};
use crate::graph::{Endpoint, Graph};
use crate::sepset::SepsetMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FciFirings {
    pub r1: usize,
    pub r2: usize,
    pub r3: usize,
    pub r4: usize,
}

impl FciFirings {
    pub fn total(&self) -> usize {
        self.r1 + self.r2 + self.r3 + self.r4
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FciReport {
    /// Endpoints set from knowledge.
    pub knowledge_orientations: usize,
    /// Unshielded colliders oriented by R0.
    pub colliders: usize,
    /// Edges removed by the possible-d-sep stage.
    pub possible_dsep_removed: usize,
    pub firings: FciFirings,
    pub passes: usize,
}

#[derive(Debug, Clone)]
pub struct FciOrienter<'a> {
    knowledge: &'a Knowledge,
    max_path_length: Option<usize>,
}

impl<'a> FciOrienter<'a> {
    pub fn new(knowledge: &'a Knowledge) -> Self {
        Self {
            knowledge,
            max_path_length: None,
        }
    }

    pub fn from_config(knowledge: &'a Knowledge, config: &SearchConfig) -> Self {
        Self::new(knowledge).with_max_path_length(config.path_length_bound())
    }

    pub fn with_max_path_length(mut self, max_path_length: Option<usize>) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Reset to `o-o`, apply knowledge, orient colliders. This is also the
    /// graph the possible-d-sep stage reads definite colliders from.
    pub fn orient_colliders(&self, graph: &mut Graph, sepsets: &SepsetMap, report: &mut FciReport) {
        graph.reorient_all_with(Endpoint::Circle);
        report.knowledge_orientations = rules::orient_knowledge(graph, self.knowledge);
        report.colliders = rules::rule_r0(graph, self.knowledge, sepsets);
        debug!(colliders = report.colliders, "R0 complete");
    }

    /// R1-R4 until a full pass changes nothing.
    pub fn apply_rules(&self, graph: &mut Graph, sepsets: &SepsetMap, report: &mut FciReport) {
        let bound = 2 * graph.edge_count() + 1;
        loop {
            report.passes += 1;
            let r1 = rules::rule_r1(graph, self.knowledge);
            let r2 = rules::rule_r2(graph, self.knowledge);
            let r3 = rules::rule_r3(graph, self.knowledge);
            let r4 = rules::rule_r4(graph, self.knowledge, sepsets, self.max_path_length);
            report.firings.r1 += r1;
            report.firings.r2 += r2;
            report.firings.r3 += r3;
            report.firings.r4 += r4;
            if r1 + r2 + r3 + r4 == 0 || report.passes > bound {
                break;
            }
        }
    }

    /// The full orientation: colliders, then rules to a fixed point.
    pub fn orient(&self, graph: &mut Graph, sepsets: &SepsetMap) -> FciReport {
        let mut report = FciReport::default();
        self.orient_colliders(graph, sepsets, &mut report);
        self.apply_rules(graph, sepsets, &mut report);
        info!(
            colliders = report.colliders,
            firings = report.firings.total(),
            circles = graph.count_endpoints(Endpoint::Circle),
            "FCI orientation complete"
        );
        report
    }
}
