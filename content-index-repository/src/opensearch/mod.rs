//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend, and the analysis settings every content
//! index is created with.

mod index_config;
mod provider;

pub use index_config::{
    IndexSettings, DEFAULT_REPLICAS, DEFAULT_SHARDS, NGRAM_ANALYZER, STARTSWITH_ANALYZER,
    WHITESPACE_ANALYZER,
};
pub use provider::OpenSearchProvider;
