//! Orientation engine: colliders, knowledge, conflict rules, Meek rules.

use causeway_core::config::ColliderConflictRule;
use causeway_core::{Knowledge, Node};
use causeway_search::graph::NodeIndex;
use causeway_search::orientation::{ConservativeClassifier, MeekRule};
use causeway_search::{Endpoint, Graph, OrientationEngine, SepsetMap};
use test_fixtures::ScriptedOracle;

/// Undirected graph over `names` with the given edges.
fn skeleton(names: &[&str], edges: &[(&str, &str)]) -> Graph {
    let mut g = Graph::from_nodes(&Node::measured(names.iter().copied()));
    for (a, b) in edges {
        let (a, b) = (g.index_of(a).unwrap(), g.index_of(b).unwrap());
        g.add_undirected_edge(a, b).unwrap();
    }
    g
}

fn sepset(map: &mut SepsetMap, x: &str, y: &str, z: &[&str]) {
    map.put(&Node::new(x), &Node::new(y), Node::measured(z.iter().copied()))
        .unwrap();
}

fn edge(g: &Graph, a: &str, b: &str) -> String {
    g.edge_string(a, b).unwrap()
}

fn idx(g: &Graph, name: &str) -> NodeIndex {
    g.index_of(name).unwrap()
}

#[test]
fn unshielded_collider_is_oriented() {
    let mut g = skeleton(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")]);
    let mut sepsets = SepsetMap::new();
    sepset(&mut sepsets, "X", "Z", &[]);
    let knowledge = Knowledge::new();

    let report = OrientationEngine::new(&knowledge).orient(&mut g, &sepsets);
    assert_eq!(report.colliders, 1);
    assert_eq!(edge(&g, "X", "Y"), "X --> Y");
    assert_eq!(edge(&g, "Z", "Y"), "Z --> Y");
}

#[test]
fn non_collider_and_unknown_stay_undirected() {
    let knowledge = Knowledge::new();
    let engine = OrientationEngine::new(&knowledge);

    let mut g = skeleton(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")]);
    let mut sepsets = SepsetMap::new();
    sepset(&mut sepsets, "X", "Z", &["Y"]);
    engine.orient(&mut g, &sepsets);
    assert_eq!(edge(&g, "X", "Y"), "X --- Y");

    // No sepset recorded: unknown, leave it.
    let mut g = skeleton(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")]);
    let report = engine.orient(&mut g, &SepsetMap::new());
    assert_eq!(report.colliders, 0);
    assert_eq!(g.count_endpoints(Endpoint::Arrow), 0);
}

#[test]
fn knowledge_pins_before_colliders() {
    let mut knowledge = Knowledge::new();
    knowledge.add_to_tier(0, "A").add_to_tier(1, "B");
    knowledge.set_forbidden("D", "C");
    let mut g = skeleton(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);

    let report = OrientationEngine::new(&knowledge).orient(&mut g, &SepsetMap::new());
    assert_eq!(report.pinned, 2);
    assert_eq!(edge(&g, "A", "B"), "A --> B");
    assert_eq!(edge(&g, "C", "D"), "C --> D");
}

#[test]
fn forbidden_arrowhead_suppresses_one_side_of_collider() {
    let mut knowledge = Knowledge::new();
    knowledge.set_forbidden("X", "Y");
    let mut g = skeleton(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")]);
    let mut sepsets = SepsetMap::new();
    sepset(&mut sepsets, "X", "Z", &[]);

    let report = OrientationEngine::new(&knowledge).orient(&mut g, &sepsets);
    assert_eq!(report.suppressed, 1);
    assert_eq!(edge(&g, "Y", "X"), "Y --> X");
    assert_eq!(edge(&g, "Z", "Y"), "Z --> Y");
}

#[test]
fn collider_conflict_rules() {
    // X - Y - Z - W with colliders at Y and at Z: both want the Y - Z edge.
    let cases = [
        (ColliderConflictRule::PrioritizeExisting, "Y <-- Z"),
        (ColliderConflictRule::OrientBidirected, "Y <-> Z"),
        (ColliderConflictRule::Overwrite, "Y --> Z"),
    ];
    let knowledge = Knowledge::new();
    for (rule, expected) in cases {
        let mut g = skeleton(&["X", "Y", "Z", "W"], &[("X", "Y"), ("Y", "Z"), ("Z", "W")]);
        let mut sepsets = SepsetMap::new();
        sepset(&mut sepsets, "X", "Z", &[]);
        sepset(&mut sepsets, "Y", "W", &[]);
        sepset(&mut sepsets, "X", "W", &[]);

        let report = OrientationEngine::new(&knowledge)
            .with_conflict_rule(rule)
            .orient(&mut g, &sepsets);
        assert_eq!(report.colliders, 2);
        assert_eq!(edge(&g, "Y", "Z"), expected, "{rule:?}");
        assert_eq!(edge(&g, "X", "Y"), "X --> Y");
        assert_eq!(edge(&g, "W", "Z"), "W --> Z");
    }
}

#[test]
fn meek_rules_reach_fixed_point_and_are_idempotent() {
    // A --> C <-- B, C - D: R1 orients C --> D.
    let mut g = skeleton(&["A", "B", "C", "D"], &[("A", "C"), ("B", "C"), ("C", "D")]);
    let mut sepsets = SepsetMap::new();
    sepset(&mut sepsets, "A", "B", &[]);
    sepset(&mut sepsets, "A", "D", &["C"]);
    sepset(&mut sepsets, "B", "D", &["C"]);
    let knowledge = Knowledge::new();
    let engine = OrientationEngine::new(&knowledge);

    let report = engine.orient(&mut g, &sepsets);
    assert_eq!(report.firings.get(MeekRule::R1), 1);
    assert_eq!(edge(&g, "C", "D"), "C --> D");

    let before = g.edges();
    let again = engine.apply_meek_rules(&mut g);
    assert_eq!(again.total_firings(), 0);
    assert_eq!(again.passes, 1);
    assert_eq!(g.edges(), before);
}

#[test]
fn each_firing_adds_exactly_one_arrowhead() {
    // A --> B - C - D - E, plus B - D: R1 and R2 both have work to do.
    let mut g = skeleton(
        &["A", "B", "C", "D", "E"],
        &[("B", "C"), ("C", "D"), ("D", "E"), ("B", "D")],
    );
    let (a, b) = (idx(&g, "A"), idx(&g, "B"));
    g.add_directed_edge(a, b).unwrap();
    let knowledge = Knowledge::new();
    let engine = OrientationEngine::new(&knowledge);

    let bound = 2 * g.edge_count();
    let mut steps = 0;
    let mut arrows = g.count_endpoints(Endpoint::Arrow);
    while engine.meek_step(&mut g).is_some() {
        steps += 1;
        let now = g.count_endpoints(Endpoint::Arrow);
        assert_eq!(now, arrows + 1);
        arrows = now;
        assert!(steps <= bound);
    }
    assert!(steps >= 3);
    assert!(!g.has_directed_cycle());
}

#[test]
fn prevent_cycles_on_four_cycle() {
    // A - B - C - D - A with A --> B required. R1 walks the loop and would
    // close it with D --> A.
    let edges = [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")];
    let mut knowledge = Knowledge::new();
    knowledge.set_required("A", "B");

    let mut free = skeleton(&["A", "B", "C", "D"], &edges);
    OrientationEngine::new(&knowledge).orient(&mut free, &SepsetMap::new());
    assert!(free.has_directed_cycle());

    let mut guarded = skeleton(&["A", "B", "C", "D"], &edges);
    let report = OrientationEngine::new(&knowledge)
        .with_prevent_cycles(true)
        .orient(&mut guarded, &SepsetMap::new());
    assert!(!guarded.has_directed_cycle());
    assert_eq!(report.skipped_cycle, 1);
    assert_eq!(edge(&guarded, "D", "A"), "D --- A");
}

#[test]
fn conservative_classifier_marks_ambiguous_triples() {
    // X _||_ Z given {} and given {Y}: the sets disagree about Y.
    let oracle = ScriptedOracle::new()
        .independent("X", "Z", &[])
        .independent("X", "Z", &["Y"])
        .independent("W", "Y", &["X"]);
    let mut g = skeleton(&["W", "X", "Y", "Z"], &[("W", "X"), ("X", "Y"), ("Y", "Z")]);
    let mut sepsets = SepsetMap::new();
    let knowledge = Knowledge::new();
    let classifier = ConservativeClassifier::new(&oracle, -1);

    let report = OrientationEngine::new(&knowledge)
        .orient_with(&mut g, &mut sepsets, &classifier)
        .unwrap();
    assert_eq!(report.ambiguous, 1);
    assert_eq!(report.colliders, 0);
    assert!(sepsets.is_ambiguous(&Node::new("Z"), &Node::new("Y"), &Node::new("X")));
    assert_eq!(g.count_endpoints(Endpoint::Arrow), 0);
    assert!(classifier.tests_performed() > 0);
}

#[test]
fn conservative_classifier_agrees_on_clear_collider() {
    let oracle = ScriptedOracle::new().independent("X", "Z", &[]);
    let mut g = skeleton(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")]);
    let mut sepsets = SepsetMap::new();
    let knowledge = Knowledge::new();
    let classifier = ConservativeClassifier::new(&oracle, -1);

    let report = OrientationEngine::new(&knowledge)
        .orient_with(&mut g, &mut sepsets, &classifier)
        .unwrap();
    assert_eq!(report.colliders, 1);
    assert_eq!(edge(&g, "X", "Y"), "X --> Y");
    assert_eq!(edge(&g, "Z", "Y"), "Z --> Y");
}
