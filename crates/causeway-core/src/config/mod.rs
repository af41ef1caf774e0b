//! Configuration system for causeway.
//! TOML-based, strongly typed, unknown keys rejected at load time.

pub mod causeway_config;
pub mod defaults;
pub mod observability_config;
pub mod search_config;

pub use causeway_config::CausewayConfig;
pub use observability_config::ObservabilityConfig;
pub use search_config::{AdjacencyMode, ColliderConflictRule, ColliderDiscovery, SearchConfig};
