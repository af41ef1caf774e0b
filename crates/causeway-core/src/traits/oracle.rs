//! The conditional-independence oracle seam.

use serde::{Deserialize, Serialize};

use crate::errors::OracleFailure;
use crate::models::Node;

/// Outcome of one conditional-independence query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndependenceResult {
    pub independent: bool,
    /// p-value-like score; larger means "more independent".
    pub p_value: f64,
}

impl IndependenceResult {
    pub fn independent(p_value: f64) -> Self {
        Self {
            independent: true,
            p_value,
        }
    }

    pub fn dependent(p_value: f64) -> Self {
        Self {
            independent: false,
            p_value,
        }
    }
}

/// Decides whether `x` and `y` are independent given `z`.
///
/// Implementations must be deterministic for fixed inputs within one search
/// run. Calls may be slow; the search treats each one as a suspension point
/// and checks for cancellation before issuing it. `Sync` is required because
/// one depth level of the stable adjacency search may query the oracle from
/// several worker threads.
pub trait IndependenceOracle: Send + Sync {
    fn test(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, OracleFailure>;

    /// Short name used in log lines.
    fn name(&self) -> &str {
        "oracle"
    }
}

impl<T: IndependenceOracle + ?Sized> IndependenceOracle for std::sync::Arc<T> {
    fn test(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, OracleFailure> {
        (**self).test(x, y, z)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
