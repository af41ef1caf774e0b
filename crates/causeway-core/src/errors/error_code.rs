//! ErrorCode trait for stable, machine-readable error identifiers.

/// Every error enum implements this to expose a structured error code
/// string that front ends can match on without parsing messages.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "ORACLE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const ORACLE_ERROR: &str = "ORACLE_ERROR";
pub const KNOWLEDGE_CONFLICT: &str = "KNOWLEDGE_CONFLICT";
pub const KNOWLEDGE_ERROR: &str = "KNOWLEDGE_ERROR";
pub const SEPSET_ERROR: &str = "SEPSET_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const UNKNOWN_ALGORITHM: &str = "UNKNOWN_ALGORITHM";
