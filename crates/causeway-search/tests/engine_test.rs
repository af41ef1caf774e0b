//! Registry resolution, input validation and end-to-end PC-family runs.

use causeway_core::errors::ErrorCode;
use causeway_core::{
    AlgorithmId, CancellationToken, Cancellable, CausewayConfig, Knowledge, Node, SearchConfig,
};
use causeway_search::{
    AlgorithmRegistry, SearchAlgorithm, SearchEngine, SearchError, SearchOutcome, SearchRequest,
    SearchResult, SearchStatus,
};
use test_fixtures::DagFixture;

fn run(algorithm: AlgorithmId, fixture: &str, config: &SearchConfig) -> SearchOutcome {
    let dag = DagFixture::load(fixture);
    let oracle = dag.oracle();
    let nodes = dag.measured_nodes();
    let knowledge = Knowledge::new();
    let request = SearchRequest::new(&nodes, &oracle, &knowledge, config);
    SearchEngine::new().run(algorithm, &request).unwrap()
}

#[test]
fn registry_resolves_builtins() {
    let registry = AlgorithmRegistry::with_defaults();
    assert_eq!(registry.ids(), AlgorithmId::ALL.to_vec());
    for id in AlgorithmId::ALL {
        assert_eq!(registry.get(id).unwrap().id(), id);
    }
    assert_eq!(registry.get_by_name("pc-stable").unwrap().id(), AlgorithmId::PcStable);

    let err = registry.get_by_name("ges").err().unwrap();
    assert_eq!(err.error_code(), "UNKNOWN_ALGORITHM");
    let empty = AlgorithmRegistry::new();
    assert!(matches!(empty.get(AlgorithmId::Pc), Err(SearchError::UnknownAlgorithm(_))));
}

#[test]
fn pc_family_recovers_collider_chain() {
    for id in [AlgorithmId::Pc, AlgorithmId::PcStable, AlgorithmId::Cpc] {
        let outcome = run(id, "collider_chain", &SearchConfig::default());
        let g = &outcome.graph;
        assert_eq!(outcome.algorithm, id);
        assert_eq!(outcome.status, SearchStatus::Completed);
        assert_eq!(g.edge_string("A", "C").as_deref(), Some("A --> C"), "{id}");
        assert_eq!(g.edge_string("B", "C").as_deref(), Some("B --> C"), "{id}");
        assert_eq!(g.edge_string("C", "D").as_deref(), Some("C --> D"), "{id}");
        assert_eq!(outcome.non_adjacencies().len(), 3);
        assert_eq!(outcome.adjacencies().len(), 3);
        assert!(outcome.orientation.is_some());
    }
}

#[test]
fn chain_has_no_orientation() {
    let outcome = run(AlgorithmId::PcStable, "chain", &SearchConfig::default());
    assert_eq!(outcome.graph.edge_string("X", "Y").as_deref(), Some("X --- Y"));
    assert_eq!(outcome.graph.edge_string("Y", "Z").as_deref(), Some("Y --- Z"));
    let report = outcome.orientation.unwrap();
    assert_eq!(report.colliders, 0);
    assert_eq!(report.total_firings(), 0);
}

#[test]
fn invalid_inputs_fail_before_search() {
    let dag = DagFixture::load("chain");
    let oracle = dag.oracle();
    let knowledge = Knowledge::new();
    let engine = SearchEngine::new();

    let duplicated = Node::measured(["X", "Y", "X"]);
    let config = SearchConfig::default();
    let err = engine
        .run(AlgorithmId::Pc, &SearchRequest::new(&duplicated, &oracle, &knowledge, &config))
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument { .. }));

    let nodes = dag.measured_nodes();
    let bad_config = SearchConfig::default().with_max_depth(-5);
    let err = engine
        .run(AlgorithmId::Pc, &SearchRequest::new(&nodes, &oracle, &knowledge, &bad_config))
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    assert!(matches!(err, SearchError::InvalidArgument { ref field, .. } if field == "max_depth"));

    let mut unknown = Knowledge::new();
    unknown.set_required("X", "Q");
    let err = engine
        .run(AlgorithmId::Pc, &SearchRequest::new(&nodes, &oracle, &unknown, &config))
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    assert!(matches!(err, SearchError::InvalidArgument { ref field, .. } if field == "knowledge"));
    assert_eq!(oracle.call_count(), 0);
}

#[test]
fn knowledge_conflicts_warn_or_fail() {
    let dag = DagFixture::load("chain");
    let oracle = dag.oracle();
    let nodes = dag.measured_nodes();
    let mut knowledge = Knowledge::new();
    knowledge.set_required("Y", "X").set_forbidden("Y", "X");

    let lenient = SearchConfig::default();
    let outcome = SearchEngine::new()
        .run(AlgorithmId::PcStable, &SearchRequest::new(&nodes, &oracle, &knowledge, &lenient))
        .unwrap();
    assert_eq!(outcome.knowledge_warnings.len(), 1);
    // Required wins.
    assert_eq!(outcome.graph.edge_string("Y", "X").as_deref(), Some("Y --> X"));

    let strict = SearchConfig {
        strict_knowledge: true,
        ..SearchConfig::default()
    };
    let calls_before = oracle.call_count();
    let err = SearchEngine::new()
        .run(AlgorithmId::PcStable, &SearchRequest::new(&nodes, &oracle, &knowledge, &strict))
        .unwrap_err();
    assert_eq!(err.error_code(), "KNOWLEDGE_CONFLICT");
    assert_eq!(oracle.call_count(), calls_before);
}

#[test]
fn canceled_search_returns_unoriented_skeleton() {
    let dag = DagFixture::load("collider_chain");
    let oracle = dag.oracle();
    let nodes = dag.measured_nodes();
    let knowledge = Knowledge::new();
    let config = SearchConfig::default();
    let token = CancellationToken::new();
    token.cancel();

    let request = SearchRequest::new(&nodes, &oracle, &knowledge, &config).with_cancellation(&token);
    let outcome = SearchEngine::new().run(AlgorithmId::PcStable, &request).unwrap();
    assert!(outcome.is_canceled());
    assert!(outcome.orientation.is_none());
    assert_eq!(outcome.graph.edge_count(), 6);
}

#[test]
fn configured_run_uses_file_settings() {
    let config = CausewayConfig::from_toml(
        r#"
algorithm = "fci"

[search]
max_depth = 2
possible_dsep = false
"#,
    )
    .unwrap();
    let dag = DagFixture::load("latent_confounder");
    let oracle = dag.oracle();
    let nodes = dag.measured_nodes();
    let knowledge = Knowledge::new();
    let ignored = SearchConfig::default();
    let request = SearchRequest::new(&nodes, &oracle, &knowledge, &ignored);

    let outcome = SearchEngine::new().run_configured(&config, &request).unwrap();
    assert_eq!(outcome.algorithm, AlgorithmId::Fci);
    assert!(outcome.fci.is_some());
    assert!(outcome.depth_reached.unwrap() <= 2);
}

#[test]
fn outcome_serializes_to_json() {
    let outcome = run(AlgorithmId::PcStable, "collider_chain", &SearchConfig::default());
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["algorithm"], "pc-stable");
    assert_eq!(json["status"], "completed");
    assert_eq!(json["graph"]["edges"].as_array().unwrap().len(), 3);
    assert_eq!(json["sepsets"]["sepsets"].as_array().unwrap().len(), 3);
}

struct Fixed;

impl SearchAlgorithm for Fixed {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Pc
    }

    fn search(&self, request: &SearchRequest<'_>) -> SearchResult<SearchOutcome> {
        let adjacency = request
            .adjacency_search(request.config.adjacency_mode)
            .search(&request.nodes[..1])?;
        Ok(SearchOutcome {
            algorithm: self.id(),
            graph: adjacency.graph,
            sepsets: adjacency.sepsets,
            status: adjacency.status,
            depth_reached: adjacency.depth_reached,
            tests_performed: adjacency.tests_performed,
            orientation: None,
            fci: None,
            knowledge_warnings: Vec::new(),
        })
    }
}

#[test]
fn registered_algorithm_replaces_builtin() {
    let mut engine = SearchEngine::new();
    assert!(engine.registry_mut().register(Box::new(Fixed)).is_some());
    let dag = DagFixture::load("chain");
    let oracle = dag.oracle();
    let nodes = dag.measured_nodes();
    let knowledge = Knowledge::new();
    let config = SearchConfig::default();
    let outcome = engine
        .run(AlgorithmId::Pc, &SearchRequest::new(&nodes, &oracle, &knowledge, &config))
        .unwrap();
    assert_eq!(outcome.graph.node_count(), 1);
}
