//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesPutMappingParts},
    DeleteParts, IndexParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::{IndexOperation, SearchIndexError};
use crate::interfaces::SearchIndexProvider;
use crate::types::{DeleteOutcome, IndexMetadata};
use crate::utils::validate_index_name;

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use content_index_repository::{IndexSettings, OpenSearchProvider, SearchIndexProvider};
///
/// let provider = OpenSearchProvider::new("http://localhost:9200", Duration::from_secs(30)).await?;
/// provider.create_index("content_primary", &IndexSettings::default().body()).await?;
/// provider
///     .upsert_document("content_primary", "article_42", &serde_json::json!({ "post_title": "Hello" }))
///     .await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `timeout` - Timeout applied to every request
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(url: &str, timeout: Duration) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::unreachable(format!("{}: {}", url, e)))?;

        let transport = TransportBuilder::new(SingleNodeConnectionPool::new(parsed_url))
            .disable_proxy()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchIndexError::unreachable(e.to_string()))?;

        info!(
            url = %url,
            timeout_secs = timeout.as_secs(),
            "Created OpenSearch provider"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Classify a response by status code.
    ///
    /// A 404 is returned as `Reply::Missing` so that deletes can treat it as
    /// success. Any other non-2xx status becomes a rejection carrying the
    /// response body.
    async fn classify(
        operation: IndexOperation,
        index: &str,
        response: Response,
    ) -> Result<Reply, SearchIndexError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(Reply::Done(response));
        }
        if status.as_u16() == 404 {
            return Ok(Reply::Missing);
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            operation = %operation,
            index = %index,
            status = %status,
            body = %body,
            "Search backend rejected request"
        );
        Err(SearchIndexError::rejected(
            operation,
            index,
            format!("status {}: {}", status, body),
        ))
    }

    /// Like [`classify`](Self::classify), for requests where a missing index
    /// is a failure.
    async fn expect_done(
        operation: IndexOperation,
        index: &str,
        response: Response,
    ) -> Result<Response, SearchIndexError> {
        match Self::classify(operation, index, response).await? {
            Reply::Done(response) => Ok(response),
            Reply::Missing => Err(SearchIndexError::rejected(
                operation,
                index,
                "index does not exist",
            )),
        }
    }
}

enum Reply {
    Done(Response),
    Missing,
}

fn send_failed(
    operation: IndexOperation,
    index: &str,
) -> impl FnOnce(opensearch::Error) -> SearchIndexError + '_ {
    move |e| SearchIndexError::rejected(operation, index, e.to_string())
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn create_index(
        &self,
        name: &str,
        settings: &Value,
    ) -> Result<IndexMetadata, SearchIndexError> {
        validate_index_name(name)?;
        let operation = IndexOperation::CreateIndex;

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(settings)
            .send()
            .await
            .map_err(send_failed(operation, name))?;
        let response = Self::expect_done(operation, name, response).await?;

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::response(e.to_string()))?;

        info!(index = %name, "Index created");
        Ok(IndexMetadata::from_response(name, &body))
    }

    async fn delete_index(&self, name: &str) -> Result<DeleteOutcome, SearchIndexError> {
        validate_index_name(name)?;
        let operation = IndexOperation::DeleteIndex;

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await
            .map_err(send_failed(operation, name))?;

        match Self::classify(operation, name, response).await? {
            Reply::Done(_) => {
                info!(index = %name, "Index deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Reply::Missing => {
                debug!(index = %name, "Index to delete is missing");
                Ok(DeleteOutcome::Missing)
            }
        }
    }

    async fn put_mapping(&self, name: &str, properties: &Value) -> Result<(), SearchIndexError> {
        validate_index_name(name)?;
        let operation = IndexOperation::PutMapping;

        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[name]))
            .body(json!({ "properties": properties }))
            .send()
            .await
            .map_err(send_failed(operation, name))?;
        Self::expect_done(operation, name, response).await?;

        debug!(index = %name, "Mappings installed");
        Ok(())
    }

    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), SearchIndexError> {
        if id.is_empty() {
            return Err(SearchIndexError::validation("Document id is required"));
        }
        let operation = IndexOperation::WriteDocument;

        // The index API replaces the whole document, creating it when absent
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(body)
            .send()
            .await
            .map_err(send_failed(operation, index))?;
        Self::expect_done(operation, index, response).await?;

        debug!(index = %index, doc_id = %id, "Document indexed");
        Ok(())
    }

    async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DeleteOutcome, SearchIndexError> {
        let operation = IndexOperation::DeleteDocument;

        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(send_failed(operation, index))?;

        // 404 covers both a missing document and a missing index
        match Self::classify(operation, index, response).await? {
            Reply::Done(_) => {
                debug!(index = %index, doc_id = %id, "Document deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Reply::Missing => {
                debug!(index = %index, doc_id = %id, "Document to delete is missing");
                Ok(DeleteOutcome::Missing)
            }
        }
    }
}
