//! Administrative actions triggered by an operator.
//!
//! Every action reports through an [`ActionResponse`]. Failures end up in its
//! `errors` list so that one failing index does not hide the outcome of the
//! others.

use std::sync::Arc;

use content_index_shared::{Generation, ProgressState};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::admin::IndexAdministrator;
use crate::config::IndexNames;
use crate::indexer::Indexer;
use crate::processor::{ContentEvent, ContentProcessor};
use crate::progress::BulkIndexer;

/// Result of an administrative action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionResponse {
    pub message: String,
    /// Bulk-indexing progress after the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProgressState>,
    /// Number of items the action indexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ActionResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The operator-facing triggers: index creation, bulk indexing, clearing and
/// replay of lifecycle events.
pub struct AdminActions {
    admin: IndexAdministrator,
    indexer: Arc<Indexer>,
    bulk: Arc<BulkIndexer>,
    processor: ContentProcessor,
    indices: IndexNames,
}

impl AdminActions {
    pub fn new(
        admin: IndexAdministrator,
        indexer: Arc<Indexer>,
        bulk: Arc<BulkIndexer>,
        indices: IndexNames,
    ) -> Self {
        Self {
            admin,
            indexer,
            bulk,
            processor: ContentProcessor::new(),
            indices,
        }
    }

    /// Recreate every configured index and install the mappings of every
    /// indexed kind.
    #[instrument(skip(self))]
    pub async fn create_mappings(&self) -> ActionResponse {
        let mut response = ActionResponse::new("Mappings were created successfully");

        for (generation, visibility, name) in self.indices.configured() {
            if let Err(e) = self.admin.create(&name).await {
                error!(index = %name, error = %e, "Failed to create index");
                response.errors.push(format!(
                    "{} {} index '{}': {}",
                    generation, visibility, name, e
                ));
                continue;
            }
            if let Err(e) = self.admin.put_mappings(&name).await {
                error!(index = %name, error = %e, "Failed to install mappings");
                response
                    .errors
                    .push(format!("mappings of '{}': {}", name, e));
            }
        }

        if !response.is_success() {
            response.message = "Mappings could not be created".to_string();
        }
        response
    }

    /// Run one bulk-indexing step.
    #[instrument(skip(self))]
    pub async fn index_posts(&self, fresh: bool) -> ActionResponse {
        match self.bulk.step(fresh).await {
            Ok(status) => {
                let message = if self.bulk.is_finished(&status) {
                    "Posts were indexed completely"
                } else {
                    "Posts were indexed partially"
                };
                ActionResponse {
                    status: Some(status),
                    ..ActionResponse::new(message)
                }
            }
            Err(e) => {
                error!(error = %e, "Bulk indexing step failed");
                ActionResponse {
                    errors: vec![e.to_string()],
                    ..ActionResponse::new("Posts could not be indexed")
                }
            }
        }
    }

    /// Index every term into the primary generation, then the secondary one.
    #[instrument(skip(self))]
    pub async fn index_taxonomies(&self) -> ActionResponse {
        let mut response = ActionResponse::new("Taxonomies were indexed successfully");
        let mut count = 0;

        for generation in Generation::ALL {
            if !self.indices.has_generation(generation) {
                continue;
            }
            match self.bulk.index_taxonomies(generation).await {
                Ok(indexed) => count += indexed,
                Err(e) => {
                    error!(generation = %generation, error = %e, "Taxonomy indexing failed");
                    response.errors.push(format!("{} generation: {}", generation, e));
                }
            }
        }

        if !response.is_success() {
            response.message = "Taxonomies could not be indexed".to_string();
        }
        response.count = Some(count);
        response
    }

    /// Delete every configured index.
    #[instrument(skip(self))]
    pub async fn clear_index(&self) -> ActionResponse {
        let mut response = ActionResponse::new("Index was cleared successfully");

        for (_, _, name) in self.indices.configured() {
            match self.admin.clear(&name).await {
                Ok(outcome) => info!(index = %name, missing = outcome.is_missing(), "Index cleared"),
                Err(e) => {
                    error!(index = %name, error = %e, "Failed to clear index");
                    response.errors.push(format!("index '{}': {}", name, e));
                }
            }
        }

        if !response.is_success() {
            response.message = "Index could not be cleared".to_string();
        }
        response
    }

    /// Apply lifecycle events to the live generation, in order.
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    pub async fn apply_events(&self, events: Vec<ContentEvent>) -> ActionResponse {
        let mut response = ActionResponse::new("Events were applied successfully");
        let mut count = 0;

        for action in self.processor.process_batch(events) {
            match self.indexer.apply(&action).await {
                Ok(report) if report.is_success() => count += 1,
                Ok(report) => response.errors.extend(report.failures.into_iter().map(|failure| {
                    format!(
                        "document '{}' in '{}': {}",
                        failure.document_id, failure.index, failure.error
                    )
                })),
                Err(e) => {
                    error!(error = %e, "Failed to apply event");
                    response.errors.push(e.to_string());
                }
            }
        }

        if !response.is_success() {
            response.message = "Some events could not be applied".to_string();
        }
        response.count = Some(count);
        response
    }
}
