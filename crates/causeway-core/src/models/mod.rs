pub mod algorithm;
pub mod node;

pub use algorithm::AlgorithmId;
pub use node::{Node, NodeType};
