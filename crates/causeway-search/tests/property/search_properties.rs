use std::collections::HashSet;

use causeway_core::config::AdjacencyMode;
use causeway_core::{AlgorithmId, Knowledge, Node, SearchConfig};
use causeway_search::combinations::choose;
use causeway_search::{
    AdjacencySearch, ChoiceGenerator, DepthChoiceGenerator, OrientationEngine, SearchEngine,
    SearchRequest,
};
use proptest::prelude::*;
use test_fixtures::{DSeparationOracle, ScriptedOracle};

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Forward edges `NAMES[i] -> NAMES[j]`, `i < j`, picked by `mask`.
fn dag_edges(mask: &[bool]) -> Vec<(&'static str, &'static str)> {
    let mut edges = Vec::new();
    let mut bit = 0;
    for i in 0..NAMES.len() {
        for j in i + 1..NAMES.len() {
            if mask[bit] {
                edges.push((NAMES[i], NAMES[j]));
            }
            bit += 1;
        }
    }
    edges
}

fn dag_mask() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.35), 15)
}

// ── Subset enumeration ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn choice_generator_yields_binomial_count(n in 0usize..9, k in 0usize..9) {
        let count = ChoiceGenerator::new(n, k).count() as u64;
        prop_assert_eq!(count, choose(n, k));
    }

    #[test]
    fn depth_choice_covers_every_size_once(n in 0i64..8, depth in -1i64..8) {
        let generator = DepthChoiceGenerator::new(n, depth).unwrap();
        let subsets: Vec<Vec<usize>> = generator.collect();
        let max = if depth < 0 { n } else { depth.min(n) };
        let expected: u64 = (0..=max as usize).map(|k| choose(n as usize, k)).sum();
        prop_assert_eq!(subsets.len() as u64, expected);
        for pair in subsets.windows(2) {
            prop_assert!(pair[0].len() <= pair[1].len());
        }
        for subset in &subsets {
            prop_assert!(subset.windows(2).all(|w| w[0] < w[1]), "not increasing: {:?}", subset);
            prop_assert!(subset.iter().all(|&i| i < n as usize));
        }
        let distinct: HashSet<&Vec<usize>> = subsets.iter().collect();
        prop_assert_eq!(distinct.len(), subsets.len());
    }
}

// ── Stable adjacency search ───────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn stable_search_ignores_node_order(
        mask in dag_mask(),
        order in Just(NAMES.to_vec()).prop_shuffle(),
    ) {
        let oracle = DSeparationOracle::new(dag_edges(&mask));
        let knowledge = Knowledge::new();
        let config = SearchConfig::default().with_adjacency_mode(AdjacencyMode::Stable);
        let search = AdjacencySearch::new(&oracle, &knowledge, &config);

        let sorted = search.search(&Node::measured(NAMES)).unwrap();
        let shuffled = search.search(&Node::measured(order)).unwrap();

        prop_assert_eq!(sorted.graph.adjacency_set(), shuffled.graph.adjacency_set());
        prop_assert_eq!(
            serde_json::to_value(&sorted.sepsets).unwrap(),
            serde_json::to_value(&shuffled.sepsets).unwrap()
        );
    }

    #[test]
    fn d_separation_search_recovers_skeleton(mask in dag_mask(), parallel in any::<bool>()) {
        let edges = dag_edges(&mask);
        let oracle = DSeparationOracle::new(edges.iter().copied());
        let knowledge = Knowledge::new();
        let config = SearchConfig::default().with_parallel(parallel);
        let outcome = AdjacencySearch::new(&oracle, &knowledge, &config)
            .search(&Node::measured(NAMES))
            .unwrap();

        let expected: std::collections::BTreeSet<(String, String)> = edges
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        prop_assert_eq!(outcome.graph.adjacency_set(), expected);
    }
}

// ── Orientation ───────────────────────────────────────────────────────────

fn independence_facts() -> impl Strategy<Value = Vec<(usize, usize, Option<usize>)>> {
    prop::collection::vec((0usize..6, 0usize..6, prop::option::of(0usize..6)), 0..12)
}

fn scripted(facts: &[(usize, usize, Option<usize>)]) -> ScriptedOracle {
    let mut oracle = ScriptedOracle::new();
    for &(x, y, z) in facts {
        if x == y || z == Some(x) || z == Some(y) {
            continue;
        }
        let given: Vec<&str> = z.map(|z| NAMES[z]).into_iter().collect();
        oracle = oracle.independent(NAMES[x], NAMES[y], &given);
    }
    oracle
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prevent_cycles_keeps_output_acyclic(facts in independence_facts()) {
        let oracle = scripted(&facts);
        let nodes = Node::measured(NAMES);
        let knowledge = Knowledge::new();
        let config = SearchConfig::default().with_prevent_cycles(true);
        let outcome = SearchEngine::new()
            .run(AlgorithmId::PcStable, &SearchRequest::new(&nodes, &oracle, &knowledge, &config))
            .unwrap();
        prop_assert!(!outcome.graph.has_directed_cycle());
    }

    #[test]
    fn meek_rules_reach_a_fixed_point(facts in independence_facts()) {
        let oracle = scripted(&facts);
        let nodes = Node::measured(NAMES);
        let knowledge = Knowledge::new();
        let config = SearchConfig::default();
        let outcome = SearchEngine::new()
            .run(AlgorithmId::PcStable, &SearchRequest::new(&nodes, &oracle, &knowledge, &config))
            .unwrap();

        let report = outcome.orientation.unwrap();
        prop_assert!(report.total_firings() <= 2 * outcome.graph.edge_count());

        let mut graph = outcome.graph.clone();
        prop_assert_eq!(OrientationEngine::new(&knowledge).meek_step(&mut graph), None);
        prop_assert_eq!(graph.edges(), outcome.graph.edges());
    }
}
