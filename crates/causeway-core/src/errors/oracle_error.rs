/// Failure reported by an independence oracle.
///
/// The search never retries a failed call; the failure aborts the whole
/// search and is wrapped with the offending pair and conditioning set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct OracleFailure {
    pub message: String,
}

impl OracleFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
