use causeway_core::errors::{ConfigError, ErrorCode, KnowledgeError, OracleFailure};
use causeway_core::knowledge::{ConflictReason, KnowledgeConflict};

#[test]
fn error_codes_are_stable() {
    let config = ConfigError::InvalidValue {
        field: "max_depth".into(),
        message: "must be >= -1".into(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");
    assert_eq!(
        config.coded_string(),
        "[CONFIG_ERROR] Invalid config value for max_depth: must be >= -1"
    );

    let unknown = KnowledgeError::UnknownNode { name: "Q".into() };
    assert_eq!(unknown.error_code(), "KNOWLEDGE_ERROR");
    assert_eq!(unknown.to_string(), "knowledge references unknown node: Q");
}

#[test]
fn conflict_display() {
    let c = KnowledgeConflict::new("a", "b", ConflictReason::WithinTier);
    assert_eq!(c.to_string(), "a --> b is required but forbidden within tier");
}

#[test]
fn oracle_failure_message() {
    let failure = OracleFailure::new("singular covariance matrix");
    assert_eq!(failure.to_string(), "singular covariance matrix");
}
