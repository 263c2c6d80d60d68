//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{DeleteOutcome, IndexMetadata};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// This trait defines the interface for all search index backend implementations. Implementations
/// are injected into the indexer to enable dependency injection and easy testing with
/// mock implementations.
///
/// Each method is a single round trip with no internal retry. Absent indices and documents
/// on the delete paths are reported as [`DeleteOutcome::Missing`], never as errors.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Create an index with the given settings body.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    /// * `settings` - The create-index body (`settings` and optionally `mappings`)
    ///
    /// # Returns
    ///
    /// * `Ok(IndexMetadata)` - The created index
    /// * `Err(SearchIndexError)` - If the index could not be created (e.g. it already exists)
    async fn create_index(
        &self,
        name: &str,
        settings: &Value,
    ) -> Result<IndexMetadata, SearchIndexError>;

    /// Delete an index.
    ///
    /// # Returns
    ///
    /// * `Ok(DeleteOutcome::Deleted)` - If the index was removed
    /// * `Ok(DeleteOutcome::Missing)` - If the index did not exist
    /// * `Err(SearchIndexError)` - If the deletion fails
    async fn delete_index(&self, name: &str) -> Result<DeleteOutcome, SearchIndexError>;

    /// Install field mappings on an existing index.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    /// * `properties` - The mapping `properties` object
    async fn put_mapping(&self, name: &str, properties: &Value) -> Result<(), SearchIndexError>;

    /// Create or replace a document.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index
    /// * `id` - The document id within the index
    /// * `body` - The full document body
    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Delete a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(DeleteOutcome::Deleted)` - If the document was removed
    /// * `Ok(DeleteOutcome::Missing)` - If the document (or its index) did not exist
    /// * `Err(SearchIndexError)` - If the deletion fails
    async fn delete_document(&self, index: &str, id: &str)
        -> Result<DeleteOutcome, SearchIndexError>;
}
