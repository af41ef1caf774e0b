//! Search errors.
//! Aggregates subsystem errors from causeway-core via `From` conversions.

use causeway_core::errors::error_code::{self, ErrorCode};
use causeway_core::errors::{ConfigError, KnowledgeError};
use causeway_core::knowledge::KnowledgeConflict;

use crate::graph::Graph;
use crate::sepset::SepsetMap;

pub type SearchResult<T> = Result<T, SearchError>;

/// The skeleton and sepsets that existed when a search aborted. Incomplete
/// by definition; callers must not treat it as a finished result.
#[derive(Debug, Clone)]
pub struct PartialSkeleton {
    pub graph: Graph,
    pub sepsets: SepsetMap,
}

/// Errors that can occur during a search.
///
/// Cancellation is not an error; it is reported through
/// [`SearchStatus::Canceled`](crate::SearchStatus::Canceled).
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid argument {field}: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("oracle failed testing {x} _||_ {y} | {{{}}}: {message}", .conditioning.join(", "))]
    Oracle {
        x: String,
        y: String,
        conditioning: Vec<String>,
        message: String,
        partial: Box<PartialSkeleton>,
    },

    #[error("{} knowledge conflict(s); first: {}", .conflicts.len(), .conflicts.first().map(ToString::to_string).unwrap_or_default())]
    KnowledgeConflict { conflicts: Vec<KnowledgeConflict> },

    #[error("sepset already recorded for {x}, {y}")]
    SepsetAlreadyRecorded { x: String, y: String },

    #[error("no algorithm registered for '{0}'")]
    UnknownAlgorithm(String),

    #[error("Knowledge error: {0}")]
    Knowledge(#[source] KnowledgeError),

    #[error("Configuration error: {0}")]
    Config(#[source] ConfigError),
}

/// Out-of-range values are caller input errors; file and parse problems
/// keep their own variant.
impl From<ConfigError> for SearchError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidValue { field, message } => {
                Self::InvalidArgument { field, message }
            }
            other => Self::Config(other),
        }
    }
}

/// Knowledge naming a node the search was not given is malformed input.
impl From<KnowledgeError> for SearchError {
    fn from(e: KnowledgeError) -> Self {
        match e {
            KnowledgeError::UnknownNode { name } => {
                Self::invalid("knowledge", format!("unknown node {name}"))
            }
            other => Self::Knowledge(other),
        }
    }
}

impl SearchError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The incomplete skeleton carried by an oracle failure.
    pub fn partial(&self) -> Option<&PartialSkeleton> {
        match self {
            Self::Oracle { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl ErrorCode for SearchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => error_code::INVALID_ARGUMENT,
            Self::Oracle { .. } => error_code::ORACLE_ERROR,
            Self::KnowledgeConflict { .. } => error_code::KNOWLEDGE_CONFLICT,
            Self::SepsetAlreadyRecorded { .. } => error_code::SEPSET_ERROR,
            Self::UnknownAlgorithm(_) => error_code::UNKNOWN_ALGORITHM,
            Self::Knowledge(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
