//! Zhang's orientation rules R1-R4 over PAG endpoint marks.
//!
//! Notation: `mark(a, b)` is the mark at `b` on `a *-* b`.

use std::collections::{HashSet, VecDeque};

use causeway_core::Knowledge;
use petgraph::stable_graph::NodeIndex;

use crate::graph::{Endpoint, Graph};
use crate::sepset::SepsetMap;

/// An arrowhead may go at `to` on `from *-* to` if the mark there is still
/// open and knowledge does not require `to --> from`.
pub(crate) fn is_arrowhead_allowed(
    graph: &Graph,
    knowledge: &Knowledge,
    from: NodeIndex,
    to: NodeIndex,
) -> bool {
    match graph.endpoint(from, to) {
        Some(Endpoint::Arrow) => true,
        Some(Endpoint::Circle) => {
            !knowledge.is_required(graph.node(to).name(), graph.node(from).name())
        }
        _ => false,
    }
}

fn mark(graph: &Graph, a: NodeIndex, b: NodeIndex) -> Option<Endpoint> {
    graph.endpoint(a, b)
}

/// Set the mark at `to` and report whether anything changed.
fn set_mark(graph: &mut Graph, from: NodeIndex, to: NodeIndex, endpoint: Endpoint) -> bool {
    if graph.endpoint(from, to) == Some(endpoint) {
        return false;
    }
    graph.set_endpoint(from, to, endpoint)
}

/// R1: `a *-> b o-* c`, `a` and `c` nonadjacent ⇒ `b --> c`.
pub(crate) fn rule_r1(graph: &mut Graph, knowledge: &Knowledge) -> usize {
    let mut fired = 0;
    for b in graph.node_indices().to_vec() {
        let adjacent = graph.adjacent_nodes(b);
        for &a in &adjacent {
            if mark(graph, a, b) != Some(Endpoint::Arrow) {
                continue;
            }
            for &c in &adjacent {
                if c == a || graph.is_adjacent(a, c) || mark(graph, c, b) != Some(Endpoint::Circle) {
                    continue;
                }
                if !is_arrowhead_allowed(graph, knowledge, b, c) {
                    continue;
                }
                let changed = set_mark(graph, b, c, Endpoint::Arrow) | set_mark(graph, c, b, Endpoint::Tail);
                if changed {
                    fired += 1;
                }
            }
        }
    }
    fired
}

/// R2: `a --> b *-> c` or `a *-> b --> c`, with `a *-o c` ⇒ `a *-> c`.
pub(crate) fn rule_r2(graph: &mut Graph, knowledge: &Knowledge) -> usize {
    let mut fired = 0;
    for (x, y) in graph.edge_pairs() {
        for (a, c) in [(x, y), (y, x)] {
            if mark(graph, a, c) != Some(Endpoint::Circle) {
                continue;
            }
            let forced = graph.adjacent_nodes(a).into_iter().any(|b| {
                b != c
                    && graph.is_adjacent(b, c)
                    && ((graph.is_directed_from_to(a, b) && mark(graph, b, c) == Some(Endpoint::Arrow))
                        || (mark(graph, a, b) == Some(Endpoint::Arrow)
                            && graph.is_directed_from_to(b, c)))
            });
            if forced
                && is_arrowhead_allowed(graph, knowledge, a, c)
                && set_mark(graph, a, c, Endpoint::Arrow)
            {
                fired += 1;
            }
        }
    }
    fired
}

/// R3: `a *-> b <-* c`, `a *-o d o-* c`, `a` and `c` nonadjacent,
/// `d *-o b` ⇒ `d *-> b`.
pub(crate) fn rule_r3(graph: &mut Graph, knowledge: &Knowledge) -> usize {
    let mut fired = 0;
    for b in graph.node_indices().to_vec() {
        let adjacent = graph.adjacent_nodes(b);
        for &d in &adjacent {
            if mark(graph, d, b) != Some(Endpoint::Circle) {
                continue;
            }
            let parents: Vec<NodeIndex> = adjacent
                .iter()
                .copied()
                .filter(|&a| {
                    a != d
                        && mark(graph, a, b) == Some(Endpoint::Arrow)
                        && graph.is_adjacent(a, d)
                        && mark(graph, a, d) == Some(Endpoint::Circle)
                })
                .collect();
            let forced = parents.iter().enumerate().any(|(i, &a)| {
                parents[i + 1..].iter().any(|&c| !graph.is_adjacent(a, c))
            });
            if forced
                && is_arrowhead_allowed(graph, knowledge, d, b)
                && set_mark(graph, d, b, Endpoint::Arrow)
            {
                fired += 1;
            }
        }
    }
    fired
}

/// R4 over discriminating paths `<d, ..., a, b, c>` for `b`, where
/// `b o-* c`, `a <-* b` and `a --> c`. Every node between `d` and `b` is a
/// collider on the path and a parent of `c`; `d` is not adjacent to `c`.
///
/// `b` in sepset(d, c) gives `b --> c`, otherwise `a <-> b <-> c`. No
/// recorded sepset leaves the triple alone.
pub(crate) fn rule_r4(
    graph: &mut Graph,
    knowledge: &Knowledge,
    sepsets: &SepsetMap,
    max_path_length: Option<usize>,
) -> usize {
    let mut fired = 0;
    for b in graph.node_indices().to_vec() {
        for c in graph.adjacent_nodes(b) {
            if mark(graph, c, b) != Some(Endpoint::Circle) {
                continue;
            }
            for a in graph.adjacent_nodes(b) {
                if a == c
                    || mark(graph, b, a) != Some(Endpoint::Arrow)
                    || !graph.is_directed_from_to(a, c)
                {
                    continue;
                }
                let Some(d) = discriminating_end(graph, a, b, c, max_path_length) else {
                    continue;
                };
                let Some(sepset) = sepsets.get(graph.node(d), graph.node(c)) else {
                    continue;
                };
                let changed = if sepset.contains(graph.node(b)) {
                    is_arrowhead_allowed(graph, knowledge, b, c)
                        && (set_mark(graph, b, c, Endpoint::Arrow)
                            | set_mark(graph, c, b, Endpoint::Tail))
                } else {
                    is_arrowhead_allowed(graph, knowledge, a, b)
                        && is_arrowhead_allowed(graph, knowledge, c, b)
                        && is_arrowhead_allowed(graph, knowledge, b, c)
                        && (set_mark(graph, a, b, Endpoint::Arrow)
                            | set_mark(graph, c, b, Endpoint::Arrow)
                            | set_mark(graph, b, c, Endpoint::Arrow))
                };
                if changed {
                    fired += 1;
                    break;
                }
            }
        }
    }
    fired
}

/// Breadth-first search backwards from `a` for the far end `d` of a
/// discriminating path for `b`.
fn discriminating_end(
    graph: &Graph,
    a: NodeIndex,
    b: NodeIndex,
    c: NodeIndex,
    max_path_length: Option<usize>,
) -> Option<NodeIndex> {
    let mut visited: HashSet<NodeIndex> = [a, b, c].into_iter().collect();
    // (node, nodes between it and b on the path)
    let mut queue = VecDeque::from([(a, 1usize)]);
    while let Some((t, length)) = queue.pop_front() {
        if max_path_length.is_some_and(|bound| length > bound) {
            continue;
        }
        for d in graph.adjacent_nodes(t) {
            if visited.contains(&d) || mark(graph, d, t) != Some(Endpoint::Arrow) {
                continue;
            }
            if !graph.is_adjacent(d, c) {
                return Some(d);
            }
            if graph.is_directed_from_to(d, c) && mark(graph, t, d) == Some(Endpoint::Arrow) {
                visited.insert(d);
                queue.push_back((d, length + 1));
            }
        }
    }
    None
}

/// R0: unshielded `x *-* y *-* z` with `y` outside sepset(x, z) becomes
/// `x *-> y <-* z`. Returns the number of colliders oriented.
pub(crate) fn rule_r0(graph: &mut Graph, knowledge: &Knowledge, sepsets: &SepsetMap) -> usize {
    let mut colliders = 0;
    for (x, y, z) in crate::orientation::unshielded_triples(graph) {
        if !sepsets.is_unshielded_collider(graph.node(x), graph.node(y), graph.node(z)) {
            continue;
        }
        if is_arrowhead_allowed(graph, knowledge, x, y) && is_arrowhead_allowed(graph, knowledge, z, y) {
            set_mark(graph, x, y, Endpoint::Arrow);
            set_mark(graph, z, y, Endpoint::Arrow);
            colliders += 1;
        }
    }
    colliders
}

/// Knowledge on a PAG: required `from --> to` becomes a tail at `from` and
/// an arrow at `to`; forbidden `from --> to` puts an arrowhead at `from`.
pub(crate) fn orient_knowledge(graph: &mut Graph, knowledge: &Knowledge) -> usize {
    if knowledge.is_empty() {
        return 0;
    }
    let mut oriented = 0;
    for (a, b) in graph.edge_pairs() {
        for (from, to) in [(a, b), (b, a)] {
            let (f, t) = (graph.node(from).name(), graph.node(to).name());
            if knowledge.is_required(f, t) {
                graph.set_endpoint(to, from, Endpoint::Tail);
                graph.set_endpoint(from, to, Endpoint::Arrow);
                oriented += 1;
            } else if knowledge.is_forbidden(f, t) {
                graph.set_endpoint(to, from, Endpoint::Arrow);
                oriented += 1;
            }
        }
    }
    oriented
}

#[cfg(test)]
mod tests {
    use causeway_core::Node;

    use super::*;

    #[test]
    fn r1_orients_away_from_arrowhead() {
        let mut g = Graph::from_nodes(&Node::measured(["A", "B", "C"]));
        let n = g.node_indices().to_vec();
        g.add_edge(n[0], n[1], Endpoint::Circle, Endpoint::Arrow).unwrap();
        g.add_nondirected_edge(n[1], n[2]).unwrap();
        assert_eq!(rule_r1(&mut g, &Knowledge::new()), 1);
        assert!(g.is_directed_from_to(n[1], n[2]));
    }

    #[test]
    fn r0_orients_collider() {
        let nodes = Node::measured(["X", "Y", "Z"]);
        let mut g = Graph::from_nodes(&nodes);
        let n = g.node_indices().to_vec();
        g.add_nondirected_edge(n[0], n[1]).unwrap();
        g.add_nondirected_edge(n[1], n[2]).unwrap();
        let mut sepsets = SepsetMap::new();
        sepsets.put(&nodes[0], &nodes[2], vec![]).unwrap();
        assert_eq!(rule_r0(&mut g, &Knowledge::new(), &sepsets), 1);
        assert_eq!(g.edge_string("X", "Y").as_deref(), Some("X o-> Y"));
        assert_eq!(g.edge_string("Z", "Y").as_deref(), Some("Z o-> Y"));
    }
}
