//! Background-knowledge errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while building or validating background knowledge.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("knowledge references unknown node: {name}")]
    UnknownNode { name: String },

    #[error("knowledge parse error: {message}")]
    Parse { message: String },
}

impl ErrorCode for KnowledgeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownNode { .. } | Self::Parse { .. } => error_code::KNOWLEDGE_ERROR,
        }
    }
}
