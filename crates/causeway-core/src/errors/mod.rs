//! Error handling for causeway.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod knowledge_error;
pub mod oracle_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use knowledge_error::KnowledgeError;
pub use oracle_error::OracleFailure;
