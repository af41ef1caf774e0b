//! # causeway-core
//!
//! Foundation crate for the causeway constraint-based search engine.
//! Defines the node model, background knowledge, the independence-oracle
//! seam, cancellation, errors, config, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod knowledge;
pub mod models;
pub mod traits;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::{CausewayConfig, SearchConfig};
pub use errors::{ConfigError, ErrorCode, KnowledgeError, OracleFailure};
pub use knowledge::{Knowledge, KnowledgeConflict};
pub use models::{AlgorithmId, Node, NodeType};
pub use traits::{Cancellable, CancellationToken, IndependenceOracle, IndependenceResult};
