use causeway_core::config::*;
use causeway_core::errors::ConfigError;
use causeway_core::AlgorithmId;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = CausewayConfig::from_toml("").unwrap();

    assert_eq!(config.algorithm, AlgorithmId::PcStable);

    // Search defaults
    assert_eq!(config.search.max_depth, -1);
    assert_eq!(config.search.adjacency_mode, AdjacencyMode::Stable);
    assert!(!config.search.parallel);
    assert!(!config.search.prevent_cycles);
    assert_eq!(config.search.collider_discovery, ColliderDiscovery::FirstSepset);
    assert_eq!(
        config.search.collider_conflict,
        ColliderConflictRule::PrioritizeExisting
    );
    assert!(config.search.possible_dsep);
    assert_eq!(config.search.max_path_length, -1);
    assert!(!config.search.strict_knowledge);

    // Observability defaults
    assert_eq!(config.observability.log_filter, "causeway=info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
algorithm = "fci"

[search]
max_depth = 3
adjacency_mode = "legacy"
collider_conflict = "orient_bidirected"
"#;
    let config = CausewayConfig::from_toml(toml).unwrap();
    assert_eq!(config.algorithm, AlgorithmId::Fci);
    assert_eq!(config.search.max_depth, 3);
    assert_eq!(config.search.depth_bound(), Some(3));
    assert_eq!(config.search.adjacency_mode, AdjacencyMode::Legacy);
    assert_eq!(
        config.search.collider_conflict,
        ColliderConflictRule::OrientBidirected
    );
    // Non-overridden fields keep defaults
    assert!(config.search.possible_dsep);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = CausewayConfig::from_toml("[search]\nmax_dpeth = 2\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "got {err}");

    let err = SearchConfig::from_toml("alpha = 0.05\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "got {err}");
}

#[test]
fn invalid_depth_is_rejected() {
    let err = SearchConfig::from_toml("max_depth = -2\n").unwrap_err();
    match err {
        ConfigError::InvalidValue { field, .. } => assert_eq!(field, "max_depth"),
        other => panic!("expected InvalidValue, got {other}"),
    }
}

#[test]
fn config_load_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("causeway.toml");
    std::fs::write(&path, "algorithm = \"cpc\"\n[search]\nparallel = true\n").unwrap();

    let config = CausewayConfig::load(&path).unwrap();
    assert_eq!(config.algorithm, AlgorithmId::Cpc);
    assert!(config.search.parallel);

    let missing = CausewayConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::FileNotFound { .. }));
}

#[test]
fn config_serde_roundtrip() {
    let config = CausewayConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = CausewayConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.search, config.search);
    assert_eq!(roundtripped.algorithm, config.algorithm);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn depth_bound_matches_validation(max_depth in -20i64..20) {
            let config = SearchConfig::default().with_max_depth(max_depth);
            prop_assert_eq!(config.validate().is_ok(), max_depth >= -1);
            if max_depth >= 0 {
                prop_assert_eq!(config.depth_bound(), Some(max_depth as usize));
            } else if max_depth == -1 {
                prop_assert_eq!(config.depth_bound(), None);
            }
        }
    }
}
