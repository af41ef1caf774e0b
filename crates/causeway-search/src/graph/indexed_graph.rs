//! petgraph::StableGraph wrapper with endpoint marks and O(1) pair lookup.

use std::collections::{BTreeSet, HashMap};

use causeway_core::Node;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::Undirected;
use serde::Serialize;

use super::endpoint::{Edge, Endpoint};
use crate::error::{SearchError, SearchResult};

/// Marks stored on a petgraph edge, relative to petgraph's own
/// `(source, target)` order for that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeMarks {
    pub at_source: Endpoint,
    pub at_target: Endpoint,
}

/// The underlying graph type. Direction lives in the marks, not in petgraph.
pub type MixedStableGraph = StableGraph<Node, EdgeMarks, Undirected>;

/// A mixed graph over named nodes.
///
/// Nodes keep their insertion order, which is the order every listing
/// (`node_indices`, `adjacent_nodes`, `edges`) reports. Adjacency and edge
/// lookups go through a pair map and are O(1) amortized.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// The petgraph stable graph.
    graph: MixedStableGraph,
    /// Map from node name → NodeIndex.
    node_index: HashMap<String, NodeIndex>,
    /// Insertion order.
    order: Vec<NodeIndex>,
    /// Position of each node in `order`.
    rank: HashMap<NodeIndex, usize>,
    /// Unordered pair (smaller index first) → edge.
    pairs: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

fn pair_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph over `nodes` with no edges.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node.clone());
        }
        graph
    }

    /// A complete graph over `nodes` whose every endpoint is `mark`.
    pub fn complete(nodes: &[Node], mark: Endpoint) -> Self {
        let mut graph = Self::from_nodes(nodes);
        graph.fully_connect(mark);
        graph
    }

    // --- Nodes ---

    /// Add a node, or return the index of the node with the same name.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(node.name()) {
            return idx;
        }
        let name = node.name().to_string();
        let idx = self.graph.add_node(node);
        self.node_index.insert(name, idx);
        self.rank.insert(idx, self.order.len());
        self.order.push(idx);
        idx
    }

    /// Remove a node and all its edges.
    pub fn remove_node(&mut self, idx: NodeIndex) -> bool {
        let Some(node) = self.graph.node_weight(idx) else {
            return false;
        };
        let name = node.name().to_string();
        for other in self.adjacent_nodes(idx) {
            self.pairs.remove(&pair_key(idx, other));
        }
        self.graph.remove_node(idx);
        self.node_index.remove(&name);
        self.order.retain(|&n| n != idx);
        self.rank = self
            .order
            .iter()
            .enumerate()
            .map(|(pos, &n)| (n, pos))
            .collect();
        true
    }

    /// Look up a node index by name.
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    /// The node at `idx`. Panics if `idx` was never issued by this graph.
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().map(move |&idx| &self.graph[idx])
    }

    pub fn rank(&self, idx: NodeIndex) -> usize {
        self.rank.get(&idx).copied().unwrap_or(usize::MAX)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    // --- Edges ---

    /// Add the edge `a *-* b` with `at_a` at `a` and `at_b` at `b`.
    ///
    /// Self-loops and a second edge between the same pair are rejected.
    pub fn add_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        at_a: Endpoint,
        at_b: Endpoint,
    ) -> SearchResult<()> {
        if a == b {
            return Err(SearchError::invalid(
                "edge",
                format!("self-loop on {}", self.node(a)),
            ));
        }
        if self.is_adjacent(a, b) {
            return Err(SearchError::invalid(
                "edge",
                format!("{} and {} are already adjacent", self.node(a), self.node(b)),
            ));
        }
        let marks = EdgeMarks {
            at_source: at_a,
            at_target: at_b,
        };
        let edge = self.graph.add_edge(a, b, marks);
        self.pairs.insert(pair_key(a, b), edge);
        Ok(())
    }

    /// `a --> b`
    pub fn add_directed_edge(&mut self, a: NodeIndex, b: NodeIndex) -> SearchResult<()> {
        self.add_edge(a, b, Endpoint::Tail, Endpoint::Arrow)
    }

    /// `a --- b`
    pub fn add_undirected_edge(&mut self, a: NodeIndex, b: NodeIndex) -> SearchResult<()> {
        self.add_edge(a, b, Endpoint::Tail, Endpoint::Tail)
    }

    /// `a o-o b`
    pub fn add_nondirected_edge(&mut self, a: NodeIndex, b: NodeIndex) -> SearchResult<()> {
        self.add_edge(a, b, Endpoint::Circle, Endpoint::Circle)
    }

    /// `a <-> b`
    pub fn add_bidirected_edge(&mut self, a: NodeIndex, b: NodeIndex) -> SearchResult<()> {
        self.add_edge(a, b, Endpoint::Arrow, Endpoint::Arrow)
    }

    /// Remove the edge between `a` and `b`, if any.
    pub fn remove_edge(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        match self.pairs.remove(&pair_key(a, b)) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    pub fn is_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.pairs.contains_key(&pair_key(a, b))
    }

    /// The mark at `b` on the edge `a *-* b`.
    pub fn endpoint(&self, a: NodeIndex, b: NodeIndex) -> Option<Endpoint> {
        let edge = *self.pairs.get(&pair_key(a, b))?;
        let (source, _) = self.graph.edge_endpoints(edge)?;
        let marks = self.graph.edge_weight(edge)?;
        Some(if source == b {
            marks.at_source
        } else {
            marks.at_target
        })
    }

    /// Set the mark at `b` on the edge `a *-* b`. Only that one mark
    /// changes. Returns `false` when `a` and `b` are not adjacent.
    pub fn set_endpoint(&mut self, a: NodeIndex, b: NodeIndex, mark: Endpoint) -> bool {
        let Some(&edge) = self.pairs.get(&pair_key(a, b)) else {
            return false;
        };
        let Some((source, _)) = self.graph.edge_endpoints(edge) else {
            return false;
        };
        match self.graph.edge_weight_mut(edge) {
            Some(marks) if source == b => marks.at_source = mark,
            Some(marks) => marks.at_target = mark,
            None => return false,
        }
        true
    }

    /// Orient `a *-* b` as `a --> b`.
    pub fn set_directed(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        self.set_endpoint(b, a, Endpoint::Tail) && self.set_endpoint(a, b, Endpoint::Arrow)
    }

    /// The edge between `a` and `b`, seen from `a`.
    pub fn edge(&self, a: NodeIndex, b: NodeIndex) -> Option<Edge> {
        Some(Edge::new(
            self.node(a).clone(),
            self.node(b).clone(),
            self.endpoint(b, a)?,
            self.endpoint(a, b)?,
        ))
    }

    /// Rendered edge between two named nodes, e.g. `"X --> Y"`.
    pub fn edge_string(&self, a: &str, b: &str) -> Option<String> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.edge(a, b).map(|e| e.to_string())
    }

    /// All adjacent pairs `(a, b)` with `a` before `b` in insertion order,
    /// sorted by insertion order.
    pub fn edge_pairs(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let mut pairs: Vec<(NodeIndex, NodeIndex)> = self
            .pairs
            .keys()
            .map(|&(a, b)| {
                if self.rank(a) <= self.rank(b) {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        pairs.sort_by_key(|&(a, b)| (self.rank(a), self.rank(b)));
        pairs
    }

    /// All edges, seen from the earlier node, in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.edge_pairs()
            .into_iter()
            .filter_map(|(a, b)| self.edge(a, b))
            .collect()
    }

    /// Neighbors of `a` in insertion order.
    pub fn adjacent_nodes(&self, a: NodeIndex) -> Vec<NodeIndex> {
        let mut adjacent: Vec<NodeIndex> = self.graph.neighbors(a).collect();
        adjacent.sort_by_key(|&n| self.rank(n));
        adjacent
    }

    pub fn degree(&self, a: NodeIndex) -> usize {
        self.graph.neighbors(a).count()
    }

    /// `a --> b`
    pub fn is_directed_from_to(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.endpoint(b, a) == Some(Endpoint::Tail) && self.endpoint(a, b) == Some(Endpoint::Arrow)
    }

    /// `a --- b`
    pub fn is_undirected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.endpoint(b, a) == Some(Endpoint::Tail) && self.endpoint(a, b) == Some(Endpoint::Tail)
    }

    pub fn is_parent_of(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.is_directed_from_to(a, b)
    }

    /// Nodes `p` with `p --> b`, in insertion order.
    pub fn parents(&self, b: NodeIndex) -> Vec<NodeIndex> {
        self.adjacent_nodes(b)
            .into_iter()
            .filter(|&p| self.is_directed_from_to(p, b))
            .collect()
    }

    /// Nodes `c` with `a --> c`, in insertion order.
    pub fn children(&self, a: NodeIndex) -> Vec<NodeIndex> {
        self.adjacent_nodes(a)
            .into_iter()
            .filter(|&c| self.is_directed_from_to(a, c))
            .collect()
    }

    /// `a *-> b <-* c`
    pub fn is_def_collider(&self, a: NodeIndex, b: NodeIndex, c: NodeIndex) -> bool {
        self.endpoint(a, b) == Some(Endpoint::Arrow) && self.endpoint(c, b) == Some(Endpoint::Arrow)
    }

    /// A tail at `b` on either `a *-* b` or `b *-* c`.
    pub fn is_def_noncollider(&self, a: NodeIndex, b: NodeIndex, c: NodeIndex) -> bool {
        self.endpoint(a, b) == Some(Endpoint::Tail) || self.endpoint(c, b) == Some(Endpoint::Tail)
    }

    /// Overwrite every mark of every edge with `mark`.
    pub fn reorient_all_with(&mut self, mark: Endpoint) {
        let edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for edge in edges {
            if let Some(marks) = self.graph.edge_weight_mut(edge) {
                marks.at_source = mark;
                marks.at_target = mark;
            }
        }
    }

    /// Connect every non-adjacent pair with a `mark`/`mark` edge.
    pub fn fully_connect(&mut self, mark: Endpoint) {
        let order = self.order.clone();
        for (i, &a) in order.iter().enumerate() {
            for &b in &order[i + 1..] {
                if !self.is_adjacent(a, b) {
                    let marks = EdgeMarks {
                        at_source: mark,
                        at_target: mark,
                    };
                    let edge = self.graph.add_edge(a, b, marks);
                    self.pairs.insert(pair_key(a, b), edge);
                }
            }
        }
    }

    /// Number of endpoints in the graph carrying `mark`.
    pub fn count_endpoints(&self, mark: Endpoint) -> usize {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_weight(edge))
            .map(|m| usize::from(m.at_source == mark) + usize::from(m.at_target == mark))
            .sum()
    }

    /// Adjacent pairs by name, each pair sorted, for order-free comparison
    /// and reporting.
    pub fn adjacency_set(&self) -> BTreeSet<(String, String)> {
        self.pairs
            .keys()
            .map(|&(a, b)| name_pair(self.node(a), self.node(b)))
            .collect()
    }

    /// Non-adjacent pairs by name, each pair sorted.
    pub fn non_adjacency_set(&self) -> BTreeSet<(String, String)> {
        let mut pairs = BTreeSet::new();
        for (i, &a) in self.order.iter().enumerate() {
            for &b in &self.order[i + 1..] {
                if !self.is_adjacent(a, b) {
                    pairs.insert(name_pair(self.node(a), self.node(b)));
                }
            }
        }
        pairs
    }
}

fn name_pair(a: &Node, b: &Node) -> (String, String) {
    if a.name() <= b.name() {
        (a.name().to_string(), b.name().to_string())
    } else {
        (b.name().to_string(), a.name().to_string())
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph Nodes:")?;
        let names: Vec<&str> = self.nodes().map(Node::name).collect();
        writeln!(f, "{}", names.join(";"))?;
        writeln!(f)?;
        writeln!(f, "Graph Edges:")?;
        for (i, edge) in self.edges().iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, edge)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct GraphView<'a> {
    nodes: Vec<&'a Node>,
    edges: Vec<Edge>,
}

impl Serialize for Graph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphView {
            nodes: self.nodes().collect(),
            edges: self.edges(),
        }
        .serialize(serializer)
    }
}
