//! Orientation of a skeleton into a partially directed graph.
//!
//! Three phases, in order:
//! 1. knowledge pinning: required and one-way-forbidden pairs are oriented
//!    and fixed;
//! 2. colliders: unshielded triples classified as colliders get arrowheads
//!    at the middle node, where knowledge and the conflict rule allow;
//! 3. Meek rules R1-R4 to a fixed point.
//!
//! The engine never fails on its own account. A missing sepset leaves the
//! triple unoriented. Errors only come from a classifier that consults the
//! oracle.

pub mod colliders;
mod knowledge;
pub mod meek;

use std::collections::HashSet;

use causeway_core::config::ColliderConflictRule;
use causeway_core::{Knowledge, SearchConfig};
use petgraph::stable_graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, info};

pub use self::colliders::{ConservativeClassifier, SepsetClassifier, TripleClassifier, TripleStatus};
pub use self::meek::MeekRule;
use self::knowledge::{allows_arrowhead, pin_knowledge, PinnedEdges};
use crate::error::SearchResult;
use crate::graph::{Endpoint, Graph};
use crate::sepset::SepsetMap;

/// Firings per Meek rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeekFirings {
    pub r1: usize,
    pub r2: usize,
    pub r3: usize,
    pub r4: usize,
}

impl MeekFirings {
    pub fn get(&self, rule: MeekRule) -> usize {
        match rule {
            MeekRule::R1 => self.r1,
            MeekRule::R2 => self.r2,
            MeekRule::R3 => self.r3,
            MeekRule::R4 => self.r4,
        }
    }

    fn record(&mut self, rule: MeekRule) {
        match rule {
            MeekRule::R1 => self.r1 += 1,
            MeekRule::R2 => self.r2 += 1,
            MeekRule::R3 => self.r3 += 1,
            MeekRule::R4 => self.r4 += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.r1 + self.r2 + self.r3 + self.r4
    }
}

/// What one orientation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrientationReport {
    /// Edges oriented and fixed by knowledge.
    pub pinned: usize,
    /// Triples classified as colliders.
    pub colliders: usize,
    /// Collider arrowheads withheld by knowledge, pinning or the conflict rule.
    pub suppressed: usize,
    /// Triples classified ambiguous.
    pub ambiguous: usize,
    pub firings: MeekFirings,
    /// Distinct Meek orientations skipped because knowledge forbids them.
    pub skipped_forbidden: usize,
    /// Distinct orientations skipped because they would close a cycle.
    pub skipped_cycle: usize,
    /// Full Meek passes, including the final one with no change.
    pub passes: usize,
}

impl OrientationReport {
    pub fn total_firings(&self) -> usize {
        self.firings.total()
    }
}

#[derive(Debug, Clone)]
pub struct OrientationEngine<'a> {
    knowledge: &'a Knowledge,
    prevent_cycles: bool,
    conflict_rule: ColliderConflictRule,
}

impl<'a> OrientationEngine<'a> {
    pub fn new(knowledge: &'a Knowledge) -> Self {
        Self {
            knowledge,
            prevent_cycles: false,
            conflict_rule: ColliderConflictRule::default(),
        }
    }

    pub fn from_config(knowledge: &'a Knowledge, config: &SearchConfig) -> Self {
        Self::new(knowledge)
            .with_prevent_cycles(config.prevent_cycles)
            .with_conflict_rule(config.collider_conflict)
    }

    pub fn with_prevent_cycles(mut self, prevent_cycles: bool) -> Self {
        self.prevent_cycles = prevent_cycles;
        self
    }

    pub fn with_conflict_rule(mut self, rule: ColliderConflictRule) -> Self {
        self.conflict_rule = rule;
        self
    }

    /// Orient with first-found sepsets. Cannot fail.
    pub fn orient(&self, graph: &mut Graph, sepsets: &SepsetMap) -> OrientationReport {
        let mut report = OrientationReport::default();
        let pinned = pin_knowledge(graph, self.knowledge);
        report.pinned = pinned.len();
        for (x, y, z) in unshielded_triples(graph) {
            let (xn, yn, zn) = (graph.node(x), graph.node(y), graph.node(z));
            match sepsets.collider_status(xn, yn, zn) {
                Some(true) => {
                    report.colliders += 1;
                    self.orient_collider(graph, &pinned, x, y, z, &mut report);
                }
                Some(false) => {}
                None => debug!(x = %xn, y = %yn, z = %zn, "no sepset, leaving triple unoriented"),
            }
        }
        self.apply_meek_rules_into(graph, &mut report);
        info!(
            pinned = report.pinned,
            colliders = report.colliders,
            firings = report.total_firings(),
            "orientation complete"
        );
        report
    }

    /// Orient with an arbitrary classifier. Ambiguous triples are recorded in
    /// `sepsets`.
    pub fn orient_with(
        &self,
        graph: &mut Graph,
        sepsets: &mut SepsetMap,
        classifier: &dyn TripleClassifier,
    ) -> SearchResult<OrientationReport> {
        let mut report = OrientationReport::default();
        let pinned = pin_knowledge(graph, self.knowledge);
        report.pinned = pinned.len();

        // Classify against the unoriented skeleton, then commit.
        let mut colliders = Vec::new();
        for (x, y, z) in unshielded_triples(graph) {
            match classifier.classify(graph, sepsets, x, y, z)? {
                TripleStatus::Collider => colliders.push((x, y, z)),
                TripleStatus::Ambiguous => {
                    report.ambiguous += 1;
                    sepsets.mark_ambiguous(graph.node(x), graph.node(y), graph.node(z));
                }
                TripleStatus::NonCollider | TripleStatus::Unknown => {}
            }
        }
        for (x, y, z) in colliders {
            report.colliders += 1;
            self.orient_collider(graph, &pinned, x, y, z, &mut report);
        }
        self.apply_meek_rules_into(graph, &mut report);
        info!(
            pinned = report.pinned,
            colliders = report.colliders,
            ambiguous = report.ambiguous,
            firings = report.total_firings(),
            "orientation complete"
        );
        Ok(report)
    }

    /// Run Meek rules to a fixed point on their own.
    pub fn apply_meek_rules(&self, graph: &mut Graph) -> OrientationReport {
        let mut report = OrientationReport::default();
        self.apply_meek_rules_into(graph, &mut report);
        report
    }

    /// Apply the first rule firing found, in priority order. Returns the
    /// rule that fired, or `None` at a fixed point.
    pub fn meek_step(&self, graph: &mut Graph) -> Option<MeekRule> {
        let mut report = OrientationReport::default();
        let mut skipped = HashSet::new();
        self.meek_scan(graph, &mut report, &mut skipped, true)
    }

    fn apply_meek_rules_into(&self, graph: &mut Graph, report: &mut OrientationReport) {
        let mut skipped = HashSet::new();
        let bound = 2 * graph.edge_count();
        loop {
            report.passes += 1;
            let before = report.total_firings();
            self.meek_scan(graph, report, &mut skipped, false);
            if report.total_firings() == before || report.total_firings() > bound {
                break;
            }
        }
        debug!(
            passes = report.passes,
            r1 = report.firings.r1,
            r2 = report.firings.r2,
            r3 = report.firings.r3,
            r4 = report.firings.r4,
            "meek rules at fixed point"
        );
    }

    /// One pass: every rule, in priority order, over every undirected edge
    /// in both directions. With `first_only` it stops after one firing.
    fn meek_scan(
        &self,
        graph: &mut Graph,
        report: &mut OrientationReport,
        skipped: &mut HashSet<(NodeIndex, NodeIndex)>,
        first_only: bool,
    ) -> Option<MeekRule> {
        let mut last = None;
        for rule in MeekRule::ALL {
            for (a, b) in graph.edge_pairs() {
                for (from, to) in [(a, b), (b, a)] {
                    if !graph.is_undirected(from, to) || !rule.applies(graph, from, to) {
                        continue;
                    }
                    if !allows_arrowhead(graph, self.knowledge, from, to) {
                        if skipped.insert((from, to)) {
                            report.skipped_forbidden += 1;
                        }
                        continue;
                    }
                    if self.prevent_cycles && graph.would_create_cycle(from, to) {
                        if skipped.insert((from, to)) {
                            report.skipped_cycle += 1;
                        }
                        continue;
                    }
                    graph.set_endpoint(from, to, Endpoint::Arrow);
                    report.firings.record(rule);
                    debug!(?rule, from = %graph.node(from), to = %graph.node(to), "meek rule fired");
                    last = Some(rule);
                    if first_only {
                        return last;
                    }
                }
            }
        }
        last
    }

    fn orient_collider(
        &self,
        graph: &mut Graph,
        pinned: &PinnedEdges,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
        report: &mut OrientationReport,
    ) {
        for from in [x, z] {
            if !self.place_arrowhead(graph, pinned, from, y, report) {
                report.suppressed += 1;
                debug!(
                    from = %graph.node(from),
                    at = %graph.node(y),
                    "collider arrowhead suppressed"
                );
            }
        }
    }

    /// Put an arrowhead at `to` on `from *-* to`. Returns `false` when it was
    /// withheld.
    fn place_arrowhead(
        &self,
        graph: &mut Graph,
        pinned: &PinnedEdges,
        from: NodeIndex,
        to: NodeIndex,
        report: &mut OrientationReport,
    ) -> bool {
        if pinned.contains(from, to) || graph.endpoint(from, to) == Some(Endpoint::Arrow) {
            return true;
        }
        if pinned.blocks(from, to) || !allows_arrowhead(graph, self.knowledge, from, to) {
            return false;
        }
        if self.prevent_cycles && graph.would_create_cycle(from, to) {
            report.skipped_cycle += 1;
            return false;
        }
        if graph.endpoint(to, from) == Some(Endpoint::Arrow) {
            match self.conflict_rule {
                ColliderConflictRule::PrioritizeExisting => return false,
                ColliderConflictRule::OrientBidirected => {}
                ColliderConflictRule::Overwrite => {
                    graph.set_endpoint(to, from, Endpoint::Tail);
                }
            }
        }
        graph.set_endpoint(from, to, Endpoint::Arrow)
    }
}

/// Unshielded triples `(x, y, z)`: `x` and `z` adjacent to `y`, not to each
/// other, `x` before `z`. Ordered by `y`, then `x`, then `z` in insertion
/// order.
pub fn unshielded_triples(graph: &Graph) -> Vec<(NodeIndex, NodeIndex, NodeIndex)> {
    let mut triples = Vec::new();
    for &y in graph.node_indices() {
        let adjacent = graph.adjacent_nodes(y);
        for (i, &x) in adjacent.iter().enumerate() {
            for &z in &adjacent[i + 1..] {
                if !graph.is_adjacent(x, z) {
                    triples.push((x, y, z));
                }
            }
        }
    }
    triples
}
