//! One pair at one depth: enumerate conditioning sets and ask the oracle.

use causeway_core::{Cancellable, CancellationToken, IndependenceOracle, Node, OracleFailure};
use petgraph::stable_graph::NodeIndex;

use crate::combinations::ChoiceGenerator;

/// A pair scheduled for testing, with its conditioning-set sources already
/// resolved (larger neighbor set first).
#[derive(Debug, Clone)]
pub(crate) struct PairTask {
    pub x: NodeIndex,
    pub y: NodeIndex,
    pub x_node: Node,
    pub y_node: Node,
    pub sources: Vec<Vec<Node>>,
}

impl PairTask {
    /// Build a task from `adj(x) \ {y}` and `adj(y) \ {x}`. Returns `None`
    /// when neither set reaches `depth`.
    pub fn new(
        (x, x_node): (NodeIndex, Node),
        (y, y_node): (NodeIndex, Node),
        adj_x: Vec<Node>,
        adj_y: Vec<Node>,
        depth: usize,
    ) -> Option<Self> {
        let (first, second) = if adj_y.len() > adj_x.len() {
            (adj_y, adj_x)
        } else {
            (adj_x, adj_y)
        };
        let sources: Vec<Vec<Node>> = [first, second]
            .into_iter()
            .filter(|s| s.len() >= depth)
            .collect();
        if sources.is_empty() {
            return None;
        }
        Some(Self {
            x,
            y,
            x_node,
            y_node,
            sources,
        })
    }
}

#[derive(Debug)]
pub(crate) enum Verdict {
    Separated { sepset: Vec<Node>, p_value: f64 },
    Adjacent,
    Canceled,
    Failed { conditioning: Vec<Node>, failure: OracleFailure },
}

#[derive(Debug)]
pub(crate) struct PairResult {
    pub verdict: Verdict,
    pub tests: usize,
}

/// Test `x _||_ y | z` for every `depth`-subset `z` of the task's sources
/// until one comes back independent. Subsets of the first source are not
/// re-tested when drawn again from the second.
pub(crate) fn evaluate(
    oracle: &dyn IndependenceOracle,
    cancel: Option<&CancellationToken>,
    task: &PairTask,
    depth: usize,
) -> PairResult {
    let mut tests = 0;
    for (i, source) in task.sources.iter().enumerate() {
        for choice in ChoiceGenerator::new(source.len(), depth) {
            let z: Vec<Node> = choice.iter().map(|&c| source[c].clone()).collect();
            if i > 0 && z.iter().all(|n| task.sources[0].contains(n)) {
                continue;
            }
            if cancel.is_some_and(Cancellable::is_cancelled) {
                return PairResult {
                    verdict: Verdict::Canceled,
                    tests,
                };
            }
            tests += 1;
            match oracle.test(&task.x_node, &task.y_node, &z) {
                Ok(result) if result.independent => {
                    return PairResult {
                        verdict: Verdict::Separated {
                            sepset: z,
                            p_value: result.p_value,
                        },
                        tests,
                    };
                }
                Ok(_) => {}
                Err(failure) => {
                    return PairResult {
                        verdict: Verdict::Failed {
                            conditioning: z,
                            failure,
                        },
                        tests,
                    };
                }
            }
        }
    }
    PairResult {
        verdict: Verdict::Adjacent,
        tests,
    }
}
