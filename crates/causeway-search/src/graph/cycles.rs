//! Directed-cycle detection over the `-->` edges of a mixed graph.
//!
//! Only fully directed edges (tail at one end, arrow at the other) count as
//! directed; undirected, bidirected and circle edges are ignored.

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;

use super::indexed_graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

impl Graph {
    /// DFS reachability along directed edges: can we reach `to` from `from`?
    /// A node trivially reaches itself.
    pub fn exists_directed_path(&self, from: NodeIndex, to: NodeIndex) -> bool {
        if from == to {
            return true;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for child in self.children(node) {
                if child == to {
                    return true;
                }
                if !visited.contains(&child) {
                    stack.push(child);
                }
            }
        }
        false
    }

    /// `a` reaches `b` along directed edges. Every node is its own ancestor.
    pub fn is_ancestor_of(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.exists_directed_path(a, b)
    }

    /// Whether orienting `from --> to` would close a directed cycle.
    pub fn would_create_cycle(&self, from: NodeIndex, to: NodeIndex) -> bool {
        // Self-loops are always cycles.
        if from == to {
            return true;
        }
        self.is_ancestor_of(to, from)
    }

    pub fn has_directed_cycle(&self) -> bool {
        self.find_directed_cycle().is_some()
    }

    /// One directed cycle, as a closed node sequence (first == last), found
    /// with a white/gray/black DFS. O(V + E).
    pub fn find_directed_cycle(&self) -> Option<Vec<NodeIndex>> {
        let mut color: HashMap<NodeIndex, Color> = self
            .node_indices()
            .iter()
            .map(|&n| (n, Color::White))
            .collect();
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for &root in self.node_indices() {
            if color.get(&root) != Some(&Color::White) {
                continue;
            }
            // Stack frames: (node, its children, next child position).
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
                vec![(root, self.children(root), 0)];
            color.insert(root, Color::Gray);

            while let Some((node, children, pos)) = stack.last_mut() {
                let node = *node;
                if *pos == children.len() {
                    color.insert(node, Color::Black);
                    stack.pop();
                    continue;
                }
                let child = children[*pos];
                *pos += 1;
                match color.get(&child).copied().unwrap_or(Color::White) {
                    Color::White => {
                        parent.insert(child, node);
                        color.insert(child, Color::Gray);
                        let grandchildren = self.children(child);
                        stack.push((child, grandchildren, 0));
                    }
                    Color::Gray => return Some(close_cycle(&parent, node, child)),
                    Color::Black => {}
                }
            }
        }
        None
    }
}

/// Walk parent links from `tail` back to `head`, where `tail --> head` is
/// the back edge that closed the cycle.
fn close_cycle(
    parent: &HashMap<NodeIndex, NodeIndex>,
    tail: NodeIndex,
    head: NodeIndex,
) -> Vec<NodeIndex> {
    let mut cycle = vec![tail];
    let mut current = tail;
    while current != head {
        match parent.get(&current) {
            Some(&p) => {
                cycle.push(p);
                current = p;
            }
            None => break,
        }
    }
    cycle.reverse();
    cycle.push(head);
    cycle
}

#[cfg(test)]
mod tests {
    use causeway_core::Node;

    use super::*;

    #[test]
    fn detects_cycle_and_closes_it() {
        let mut g = Graph::from_nodes(&Node::measured(["A", "B", "C", "D"]));
        let ids: Vec<_> = g.node_indices().to_vec();
        g.add_directed_edge(ids[0], ids[1]).unwrap();
        g.add_directed_edge(ids[1], ids[2]).unwrap();
        g.add_undirected_edge(ids[2], ids[3]).unwrap();
        assert!(!g.has_directed_cycle());
        assert!(g.would_create_cycle(ids[2], ids[0]));
        assert!(!g.would_create_cycle(ids[0], ids[2]));

        g.add_directed_edge(ids[2], ids[0]).unwrap();
        let cycle = g.find_directed_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
    }

    #[test]
    fn ancestry_follows_directed_edges_only() {
        let mut g = Graph::from_nodes(&Node::measured(["A", "B", "C", "D"]));
        let ids: Vec<_> = g.node_indices().to_vec();
        g.add_directed_edge(ids[0], ids[1]).unwrap();
        g.add_directed_edge(ids[1], ids[2]).unwrap();
        g.add_undirected_edge(ids[2], ids[3]).unwrap();

        assert!(g.is_ancestor_of(ids[0], ids[2]));
        assert!(g.is_ancestor_of(ids[3], ids[3]));
        assert!(!g.is_ancestor_of(ids[2], ids[0]));
        assert!(!g.is_ancestor_of(ids[2], ids[3]));
        assert!(!g.is_ancestor_of(ids[0], ids[3]));
    }

    #[test]
    fn undirected_edges_do_not_form_cycles() {
        let g = Graph::complete(&Node::measured(["A", "B", "C"]), crate::Endpoint::Tail);
        assert!(!g.has_directed_cycle());
    }
}
