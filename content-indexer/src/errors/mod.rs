//! Error types for the content indexer.

use content_index_repository::{OptionsStoreError, SearchIndexError};
use thiserror::Error;

/// Errors that can occur while configuring or running the indexer.
///
/// Failures of a single fan-out target are not represented here: they are
/// collected in a [`FanoutReport`](crate::indexer::FanoutReport) so that one
/// target cannot abort its siblings.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No document or mapping builder handles this item.
    #[error("Unsupported content kind: {0}")]
    UnsupportedContentKind(String),

    /// The content-listing collaborator failed.
    #[error("Content source error: {0}")]
    ContentSourceError(String),

    /// The persisted progress state could not be read.
    #[error("Progress state error: {0}")]
    ProgressStateError(String),

    /// Search index error.
    #[error(transparent)]
    SearchIndex(#[from] SearchIndexError),

    /// Options store error.
    #[error(transparent)]
    OptionsStore(#[from] OptionsStoreError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an unsupported content kind error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedContentKind(kind.into())
    }

    /// Create a content source error.
    pub fn content_source(msg: impl Into<String>) -> Self {
        Self::ContentSourceError(msg.into())
    }

    /// Create a progress state error.
    pub fn progress_state(msg: impl Into<String>) -> Self {
        Self::ProgressStateError(msg.into())
    }
}
