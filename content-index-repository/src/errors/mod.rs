//! Error types for the content index repository.
//!
//! This module provides one error type for search index operations and one
//! for options store operations.

mod options_store_error;
mod search_index_error;

pub use options_store_error::OptionsStoreError;
pub use search_index_error::{IndexOperation, SearchIndexError};
