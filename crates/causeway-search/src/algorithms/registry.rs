use std::collections::HashMap;

use causeway_core::AlgorithmId;

use super::{Cpc, Fci, Pc, PcStable, SearchAlgorithm};
use crate::error::{SearchError, SearchResult};

/// Explicit table from algorithm id to implementation.
#[derive(Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<AlgorithmId, Box<dyn SearchAlgorithm>>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// PC, PC-Stable, CPC and FCI.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Pc));
        registry.register(Box::new(PcStable));
        registry.register(Box::new(Cpc));
        registry.register(Box::new(Fci));
        registry
    }

    /// Register under the algorithm's own id, returning whatever it replaced.
    pub fn register(
        &mut self,
        algorithm: Box<dyn SearchAlgorithm>,
    ) -> Option<Box<dyn SearchAlgorithm>> {
        self.algorithms.insert(algorithm.id(), algorithm)
    }

    pub fn get(&self, id: AlgorithmId) -> SearchResult<&dyn SearchAlgorithm> {
        self.algorithms
            .get(&id)
            .map(|a| a.as_ref())
            .ok_or_else(|| SearchError::UnknownAlgorithm(id.to_string()))
    }

    /// Resolve by name, e.g. `"pc-stable"`.
    pub fn get_by_name(&self, name: &str) -> SearchResult<&dyn SearchAlgorithm> {
        let id: AlgorithmId = name
            .parse()
            .map_err(|_| SearchError::UnknownAlgorithm(name.to_string()))?;
        self.get(id)
    }

    pub fn contains(&self, id: AlgorithmId) -> bool {
        self.algorithms.contains_key(&id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<AlgorithmId> {
        let mut ids: Vec<AlgorithmId> = self.algorithms.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.ids())
            .finish()
    }
}
