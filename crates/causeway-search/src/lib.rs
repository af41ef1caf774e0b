//! # causeway-search
//!
//! The search engine. Reduces a complete graph to a skeleton with a
//! conditional-independence oracle, records separating sets, then orients
//! the skeleton with collider detection and propagation rules under
//! background knowledge. PC, PC-Stable, CPC and FCI are built from these
//! pieces and resolved through a closed registry.

pub mod adjacency;
pub mod algorithms;
pub mod combinations;
pub mod engine;
pub mod error;
pub mod fci;
pub mod graph;
pub mod orientation;
pub mod sepset;

pub use adjacency::{AdjacencyOutcome, AdjacencySearch, SearchStatus};
pub use algorithms::{AlgorithmRegistry, SearchAlgorithm, SearchOutcome, SearchRequest};
pub use combinations::{ChoiceGenerator, DepthChoiceGenerator};
pub use engine::SearchEngine;
pub use error::{PartialSkeleton, SearchError, SearchResult};
pub use fci::FciOrienter;
pub use graph::{Edge, Endpoint, Graph};
pub use orientation::{OrientationEngine, OrientationReport};
pub use sepset::SepsetMap;
