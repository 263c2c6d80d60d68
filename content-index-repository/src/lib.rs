//! # Content Index Repository
//!
//! This crate provides traits and implementations for the external
//! collaborators of the content indexer: the search engine client and the
//! options store holding configuration and bulk-indexing progress. It includes
//! definitions for errors, interfaces, a concrete implementation for
//! OpenSearch, and in-memory and file-backed options stores.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod options;
pub mod types;
pub mod utils;

pub use errors::{IndexOperation, OptionsStoreError, SearchIndexError};
pub use interfaces::{OptionsStore, SearchIndexProvider};
pub use opensearch::{IndexSettings, OpenSearchProvider};
pub use options::{FileOptionsStore, MemoryOptionsStore};
pub use types::{DeleteOutcome, IndexMetadata};
pub use utils::validate_index_name;
