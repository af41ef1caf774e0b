//! Background knowledge applied to an adjacency graph before any rule runs.

use std::collections::HashSet;

use causeway_core::Knowledge;
use petgraph::stable_graph::NodeIndex;
use tracing::debug;

use crate::graph::Graph;

/// Edges fixed by knowledge, as `(from, to)`. Nothing later may flip them.
#[derive(Debug, Default, Clone)]
pub(crate) struct PinnedEdges {
    edges: HashSet<(NodeIndex, NodeIndex)>,
}

impl PinnedEdges {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when `a *-* b` is pinned to anything other than `a --> b`.
    pub fn blocks(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.edges.contains(&(b, a))
    }

    pub fn contains(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.edges.contains(&(from, to))
    }
}

/// Orient every adjacent pair whose direction knowledge settles.
///
/// Required `a --> b` is applied as is. A pair forbidden one way only is
/// oriented the other way. Pairs forbidden both ways are left alone.
pub(crate) fn pin_knowledge(graph: &mut Graph, knowledge: &Knowledge) -> PinnedEdges {
    let mut pinned = PinnedEdges::default();
    if knowledge.is_empty() {
        return pinned;
    }
    for (a, b) in graph.edge_pairs() {
        let (an, bn) = (graph.node(a).name(), graph.node(b).name());
        let direction = if knowledge.is_required(an, bn) {
            Some((a, b))
        } else if knowledge.is_required(bn, an) {
            Some((b, a))
        } else {
            match (knowledge.is_forbidden(an, bn), knowledge.is_forbidden(bn, an)) {
                (true, false) => Some((b, a)),
                (false, true) => Some((a, b)),
                _ => None,
            }
        };
        if let Some((from, to)) = direction {
            debug!(from = %graph.node(from), to = %graph.node(to), "pinned by knowledge");
            graph.set_directed(from, to);
            pinned.edges.insert((from, to));
        }
    }
    pinned
}

/// Whether knowledge allows an arrowhead at `to` on `from *-* to`.
pub(crate) fn allows_arrowhead(
    graph: &Graph,
    knowledge: &Knowledge,
    from: NodeIndex,
    to: NodeIndex,
) -> bool {
    let (f, t) = (graph.node(from).name(), graph.node(to).name());
    !knowledge.is_forbidden(f, t) && !knowledge.is_required(t, f)
}
