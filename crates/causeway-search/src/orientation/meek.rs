//! Meek's propagation rules over `-->` and `---` edges.
//!
//! Each rule names a pattern that forces `a --> b` on an undirected `a --- b`:
//!
//! - R1: `c --> a`, `c` not adjacent to `b` (else a new collider at `a`).
//! - R2: `a --> c --> b` (else a cycle).
//! - R3: `a --- c --> b`, `a --- d --> b`, `c` and `d` not adjacent.
//! - R4: `a --- k --> l --> b`, `a` adjacent to `l`, `k` not adjacent to `b`.

use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeekRule {
    R1,
    R2,
    R3,
    R4,
}

impl MeekRule {
    /// Priority order.
    pub const ALL: [MeekRule; 4] = [MeekRule::R1, MeekRule::R2, MeekRule::R3, MeekRule::R4];

    /// Whether this rule forces `a --> b`. Assumes `a --- b`.
    pub fn applies(self, graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
        match self {
            MeekRule::R1 => r1(graph, a, b),
            MeekRule::R2 => r2(graph, a, b),
            MeekRule::R3 => r3(graph, a, b),
            MeekRule::R4 => r4(graph, a, b),
        }
    }
}

fn r1(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .parents(a)
        .into_iter()
        .any(|c| c != b && !graph.is_adjacent(c, b))
}

fn r2(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .children(a)
        .into_iter()
        .any(|c| graph.is_directed_from_to(c, b))
}

fn r3(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    let candidates: Vec<NodeIndex> = graph
        .adjacent_nodes(a)
        .into_iter()
        .filter(|&c| c != b && graph.is_undirected(a, c) && graph.is_directed_from_to(c, b))
        .collect();
    candidates.iter().enumerate().any(|(i, &c)| {
        candidates[i + 1..]
            .iter()
            .any(|&d| !graph.is_adjacent(c, d))
    })
}

fn r4(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .parents(b)
        .into_iter()
        .filter(|&l| l != a && graph.is_adjacent(a, l))
        .any(|l| {
            graph.parents(l).into_iter().any(|k| {
                k != a && k != b && graph.is_undirected(a, k) && !graph.is_adjacent(k, b)
            })
        })
}

#[cfg(test)]
mod tests {
    use causeway_core::Node;

    use super::*;

    fn graph(names: &[&str]) -> (Graph, Vec<NodeIndex>) {
        let g = Graph::from_nodes(&Node::measured(names.iter().copied()));
        let ids = g.node_indices().to_vec();
        (g, ids)
    }

    #[test]
    fn r1_away_from_collider() {
        let (mut g, n) = graph(&["C", "A", "B"]);
        g.add_directed_edge(n[0], n[1]).unwrap();
        g.add_undirected_edge(n[1], n[2]).unwrap();
        assert!(MeekRule::R1.applies(&g, n[1], n[2]));
        assert!(!MeekRule::R1.applies(&g, n[2], n[1]));
    }

    #[test]
    fn r2_closes_chain() {
        let (mut g, n) = graph(&["A", "C", "B"]);
        g.add_directed_edge(n[0], n[1]).unwrap();
        g.add_directed_edge(n[1], n[2]).unwrap();
        g.add_undirected_edge(n[0], n[2]).unwrap();
        assert!(MeekRule::R2.applies(&g, n[0], n[2]));
        assert!(!MeekRule::R2.applies(&g, n[2], n[0]));
    }

    #[test]
    fn r3_two_unshielded_parents() {
        let (mut g, n) = graph(&["A", "B", "C", "D"]);
        let (a, b, c, d) = (n[0], n[1], n[2], n[3]);
        g.add_undirected_edge(a, b).unwrap();
        g.add_undirected_edge(a, c).unwrap();
        g.add_undirected_edge(a, d).unwrap();
        g.add_directed_edge(c, b).unwrap();
        g.add_directed_edge(d, b).unwrap();
        assert!(MeekRule::R3.applies(&g, a, b));
        g.add_undirected_edge(c, d).unwrap();
        assert!(!MeekRule::R3.applies(&g, a, b));
    }

    #[test]
    fn r4_chain_through_adjacent_node() {
        let (mut g, n) = graph(&["A", "B", "K", "L"]);
        let (a, b, k, l) = (n[0], n[1], n[2], n[3]);
        g.add_undirected_edge(a, b).unwrap();
        g.add_undirected_edge(a, k).unwrap();
        g.add_undirected_edge(a, l).unwrap();
        g.add_directed_edge(k, l).unwrap();
        g.add_directed_edge(l, b).unwrap();
        assert!(MeekRule::R4.applies(&g, a, b));
        assert!(!MeekRule::R4.applies(&g, b, a));
    }
}
