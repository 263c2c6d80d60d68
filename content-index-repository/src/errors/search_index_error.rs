//! Search index error types.
//!
//! Absent indices and documents are not errors: delete operations report them
//! as [`DeleteOutcome::Missing`](crate::types::DeleteOutcome::Missing).

use std::fmt;

use thiserror::Error;

/// The request a backend failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOperation {
    CreateIndex,
    DeleteIndex,
    PutMapping,
    WriteDocument,
    DeleteDocument,
}

impl fmt::Display for IndexOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateIndex => "create index",
            Self::DeleteIndex => "delete index",
            Self::PutMapping => "put mapping",
            Self::WriteDocument => "write document",
            Self::DeleteDocument => "delete document",
        };
        f.write_str(name)
    }
}

/// Errors returned by a `SearchIndexProvider`.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// The request was refused before being sent (bad index name, empty id).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client could not be set up or the backend could not be reached.
    #[error("Search backend unreachable: {0}")]
    Unreachable(String),

    /// The backend failed or rejected a request on one index.
    #[error("{operation} on '{index}' failed: {reason}")]
    Rejected {
        operation: IndexOperation,
        index: String,
        reason: String,
    },

    /// The backend answered with a body that could not be read.
    #[error("Unreadable response: {0}")]
    Response(String),
}

impl SearchIndexError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    pub fn rejected(
        operation: IndexOperation,
        index: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            operation,
            index: index.into(),
            reason: reason.into(),
        }
    }

    pub fn response(msg: impl Into<String>) -> Self {
        Self::Response(msg.into())
    }

    /// The operation that failed, for backend rejections.
    pub fn operation(&self) -> Option<IndexOperation> {
        match self {
            Self::Rejected { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
