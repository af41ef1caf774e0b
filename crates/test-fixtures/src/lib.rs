//! Test oracles and DAG fixtures for causeway integration tests.
//!
//! - [`ScriptedOracle`]: table of independences, everything else dependent.
//! - [`DSeparationOracle`]: answers from d-separation in a known DAG.
//! - [`CancellingOracle`], [`FailingOracle`]: wrappers that cancel a token or
//!   fail once conditioning sets reach a given size.
//! - [`load_fixture`] / [`DagFixture`]: the JSON DAGs under `data/`.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use causeway_core::{
    Cancellable, CancellationToken, IndependenceOracle, IndependenceResult, Node, OracleFailure,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Root of the fixture data shipped with this crate.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// A DAG fixture from `data/dags/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DagFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Measured nodes, in the order searches receive them.
    pub nodes: Vec<String>,
    /// Unmeasured nodes. Present in the DAG, never handed to a search.
    #[serde(default)]
    pub latent: Vec<String>,
    /// Directed edges `[from, to]`.
    pub edges: Vec<(String, String)>,
}

impl DagFixture {
    /// Load `data/dags/<name>.json`.
    pub fn load(name: &str) -> Self {
        load_fixture(&format!("dags/{name}.json"))
    }

    pub fn measured_nodes(&self) -> Vec<Node> {
        Node::measured(self.nodes.iter().cloned())
    }

    pub fn oracle(&self) -> DSeparationOracle {
        DSeparationOracle::new(self.edges.iter().map(|(a, b)| (a.as_str(), b.as_str())))
    }
}

// =============================================================================
// Scripted oracle
// =============================================================================

type ScriptKey = (String, String, BTreeSet<String>);

fn script_key(x: &str, y: &str, z: impl IntoIterator<Item = String>) -> ScriptKey {
    let (a, b) = if x <= y { (x, y) } else { (y, x) };
    (a.to_string(), b.to_string(), z.into_iter().collect())
}

/// Oracle driven by a table of `x _||_ y | z` facts. Lookups ignore the
/// order of `x`/`y` and of `z`. Unlisted queries are dependent (p = 0).
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    facts: HashMap<ScriptKey, f64>,
    calls: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `x _||_ y | z` with p-value 1.0.
    pub fn independent(self, x: &str, y: &str, z: &[&str]) -> Self {
        self.independent_with_p(x, y, z, 1.0)
    }

    pub fn independent_with_p(mut self, x: &str, y: &str, z: &[&str], p_value: f64) -> Self {
        self.facts.insert(
            script_key(x, y, z.iter().map(|s| s.to_string())),
            p_value,
        );
        self
    }

    /// Every query seen so far, in call order.
    pub fn calls(&self) -> Vec<(String, String, Vec<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl IndependenceOracle for ScriptedOracle {
    fn test(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, OracleFailure> {
        let names: Vec<String> = z.iter().map(|n| n.name().to_string()).collect();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((x.name().to_string(), y.name().to_string(), names.clone()));
        }
        let key = script_key(x.name(), y.name(), names);
        Ok(match self.facts.get(&key) {
            Some(&p) => IndependenceResult::independent(p),
            None => IndependenceResult::dependent(0.0),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// =============================================================================
// d-separation oracle
// =============================================================================

/// Oracle that answers with d-separation in a known DAG. Independent
/// queries get p = 1.0, dependent ones p = 0.0.
#[derive(Debug, Clone, Default)]
pub struct DSeparationOracle {
    parents: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<String>>,
    calls: std::sync::Arc<AtomicUsize>,
}

impl DSeparationOracle {
    pub fn new<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut oracle = Self::default();
        for (from, to) in edges {
            oracle
                .children
                .entry(from.to_string())
                .or_default()
                .push(to.to_string());
            oracle
                .parents
                .entry(to.to_string())
                .or_default()
                .push(from.to_string());
        }
        oracle
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn parents_of(&self, n: &str) -> &[String] {
        self.parents.get(n).map(Vec::as_slice).unwrap_or(&[])
    }

    fn children_of(&self, n: &str) -> &[String] {
        self.children.get(n).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `x` and `y` are d-separated given `z` (reachability with
    /// direction of arrival, a.k.a. Bayes-ball).
    pub fn d_separated(&self, x: &str, y: &str, z: &[&str]) -> bool {
        let given: HashSet<&str> = z.iter().copied().collect();

        // Z and its ancestors: colliders here are open.
        let mut ancestors: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = z.to_vec();
        while let Some(n) = stack.pop() {
            if ancestors.insert(n) {
                stack.extend(self.parents_of(n).iter().map(String::as_str));
            }
        }

        // (node, arrived from a child)
        let mut visited: HashSet<(&str, bool)> = HashSet::new();
        let mut queue: VecDeque<(&str, bool)> = VecDeque::from([(x, true)]);
        while let Some((n, from_child)) = queue.pop_front() {
            if !visited.insert((n, from_child)) {
                continue;
            }
            if n == y && !given.contains(n) {
                return false;
            }
            let blocked = given.contains(n);
            if from_child {
                if !blocked {
                    queue.extend(self.parents_of(n).iter().map(|p| (p.as_str(), true)));
                    queue.extend(self.children_of(n).iter().map(|c| (c.as_str(), false)));
                }
            } else {
                if !blocked {
                    queue.extend(self.children_of(n).iter().map(|c| (c.as_str(), false)));
                }
                if ancestors.contains(n) {
                    queue.extend(self.parents_of(n).iter().map(|p| (p.as_str(), true)));
                }
            }
        }
        true
    }
}

impl IndependenceOracle for DSeparationOracle {
    fn test(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, OracleFailure> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let z: Vec<&str> = z.iter().map(Node::name).collect();
        Ok(if self.d_separated(x.name(), y.name(), &z) {
            IndependenceResult::independent(1.0)
        } else {
            IndependenceResult::dependent(0.0)
        })
    }

    fn name(&self) -> &str {
        "d-separation"
    }
}

// =============================================================================
// Wrappers
// =============================================================================

/// Cancels `token` on the first query whose conditioning set has at least
/// `threshold` nodes, then answers as `inner` would.
pub struct CancellingOracle<O> {
    inner: O,
    token: CancellationToken,
    threshold: usize,
}

impl<O: IndependenceOracle> CancellingOracle<O> {
    pub fn new(inner: O, token: CancellationToken, threshold: usize) -> Self {
        Self {
            inner,
            token,
            threshold,
        }
    }
}

impl<O: IndependenceOracle> IndependenceOracle for CancellingOracle<O> {
    fn test(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, OracleFailure> {
        if z.len() >= self.threshold {
            self.token.cancel();
        }
        self.inner.test(x, y, z)
    }

    fn name(&self) -> &str {
        "cancelling"
    }
}

/// Fails every query whose conditioning set has at least `size` nodes.
pub struct FailingOracle<O> {
    inner: O,
    size: usize,
    failures: AtomicUsize,
}

impl<O: IndependenceOracle> FailingOracle<O> {
    pub fn at_size(inner: O, size: usize) -> Self {
        Self {
            inner,
            size,
            failures: AtomicUsize::new(0),
        }
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl<O: IndependenceOracle> IndependenceOracle for FailingOracle<O> {
    fn test(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, OracleFailure> {
        if z.len() >= self.size {
            self.failures.fetch_add(1, Ordering::Relaxed);
            return Err(OracleFailure::new(format!(
                "singular covariance testing {x} _||_ {y}"
            )));
        }
        self.inner.test(x, y, z)
    }

    fn name(&self) -> &str {
        "failing"
    }
}
