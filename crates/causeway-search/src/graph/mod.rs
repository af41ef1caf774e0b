//! Graph model: mixed graphs with per-side endpoint marks over a
//! `petgraph::StableGraph`, plus directed-cycle checks.

pub mod cycles;
pub mod endpoint;
pub mod indexed_graph;

pub use endpoint::{Edge, Endpoint};
pub use indexed_graph::Graph;
pub use petgraph::stable_graph::NodeIndex;
