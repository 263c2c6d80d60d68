//! Write and delete fan-out over the (generation, visibility) index targets.
//!
//! Every target of one item is written concurrently and independently. A
//! failing target never prevents its siblings from being attempted; failures
//! are collected in the returned [`FanoutReport`].

use std::sync::Arc;

use content_index_repository::{DeleteOutcome, SearchIndexError, SearchIndexProvider};
use content_index_shared::{ContentItem, Generation, Visibility};
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::IndexerConfig;
use crate::document::DocumentBuilderFactory;
use crate::errors::IndexingError;
use crate::processor::SyncAction;
use crate::sources::SchemaSource;
use crate::target::{IndexTarget, TypeFactory};

/// A target that could not be written or deleted.
#[derive(Debug, Clone)]
pub struct TargetFailure {
    pub index: String,
    pub document_id: String,
    pub error: SearchIndexError,
}

/// Outcome of one item's fan-out.
#[derive(Debug, Clone, Default)]
pub struct FanoutReport {
    /// Targets the document was written to.
    pub written: usize,
    /// Targets the document was deleted from.
    pub deleted: usize,
    /// Delete targets that did not hold the document.
    pub missing: usize,
    /// Targets without a configured index.
    pub skipped: usize,
    pub failures: Vec<TargetFailure>,
}

impl FanoutReport {
    /// Whether no target failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of targets a request was sent to.
    pub fn attempted(&self) -> usize {
        self.written + self.deleted + self.missing + self.failures.len()
    }

    pub fn merge(&mut self, other: FanoutReport) {
        self.written += other.written;
        self.deleted += other.deleted;
        self.missing += other.missing;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }
}

/// Writes and deletes the documents of content items across every
/// configured index.
pub struct Indexer {
    provider: Arc<dyn SearchIndexProvider>,
    builders: DocumentBuilderFactory,
    types: TypeFactory,
    live_generation: Generation,
}

impl Indexer {
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        schema_source: Arc<dyn SchemaSource>,
        config: &IndexerConfig,
    ) -> Self {
        Self {
            provider,
            builders: DocumentBuilderFactory::new(schema_source, config),
            types: TypeFactory::new(config.indices.clone()),
            live_generation: config.live_generation,
        }
    }

    /// The generation receiving live updates.
    pub fn live_generation(&self) -> Generation {
        self.live_generation
    }

    /// Upsert an item into the live generation.
    ///
    /// # Arguments
    ///
    /// * `item` - The content item
    /// * `is_new` - Whether the item was just created. New items are also
    ///   written to the other generation so that a running reindex does not
    ///   miss them.
    ///
    /// # Returns
    ///
    /// * `Ok(FanoutReport)` - Per-target outcome
    /// * `Err(IndexingError)` - If no builder handles the item
    pub async fn upsert(
        &self,
        item: &ContentItem,
        is_new: bool,
    ) -> Result<FanoutReport, IndexingError> {
        self.upsert_into(item, is_new, self.live_generation).await
    }

    /// Upsert an item into an explicit generation.
    ///
    /// Public targets are written unless the item is private. Private
    /// targets are always written, with the private rendition when the kind
    /// has private fields.
    #[instrument(skip(self, item), fields(kind = %item.kind(), generation = %generation))]
    pub async fn upsert_into(
        &self,
        item: &ContentItem,
        is_new: bool,
        generation: Generation,
    ) -> Result<FanoutReport, IndexingError> {
        let builder = self.builders.create(item)?;

        let (Some(id), Some(kind)) = (builder.get_id(item), builder.get_kind(item)) else {
            debug!("Item has no id, nothing to index");
            return Ok(FanoutReport::default());
        };

        let Some(pair) = builder.build_pair(item) else {
            debug!(id = %id, "Item kind is not indexed");
            return Ok(FanoutReport::default());
        };
        if pair.public.is_empty() {
            debug!(id = %id, "Empty document, nothing to index");
            return Ok(FanoutReport::default());
        }

        let public = pair.public.to_value();
        let private = if pair.is_shared() {
            public.clone()
        } else {
            pair.private.to_value()
        };

        let generations = if is_new {
            vec![generation, generation.other()]
        } else {
            vec![generation]
        };
        let visibilities: &[Visibility] = if builder.is_private(item) {
            &[Visibility::Private]
        } else {
            &Visibility::ALL
        };

        let mut report = FanoutReport::default();
        let mut writes: Vec<(IndexTarget, &Value)> = Vec::new();
        for generation in generations {
            for &visibility in visibilities {
                match self.types.resolve(&kind, visibility, generation) {
                    Some(target) => {
                        let body = if visibility.is_private() { &private } else { &public };
                        writes.push((target, body));
                    }
                    None => report.skipped += 1,
                }
            }
        }

        let results = join_all(writes.iter().map(|(target, body)| {
            let document_id = target.document_id(&id);
            async move {
                let result = self
                    .provider
                    .upsert_document(&target.index, &document_id, body)
                    .await;
                (target, document_id, result)
            }
        }))
        .await;

        for (target, document_id, result) in results {
            match result {
                Ok(()) => report.written += 1,
                Err(error) => {
                    warn!(
                        index = %target.index,
                        doc_id = %document_id,
                        error = %error,
                        "Failed to write document"
                    );
                    report.failures.push(TargetFailure {
                        index: target.index.clone(),
                        document_id,
                        error,
                    });
                }
            }
        }

        debug!(
            id = %id,
            written = report.written,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Upsert fan-out finished"
        );
        Ok(report)
    }

    /// Delete an item from every generation.
    ///
    /// Private items are only deleted from private targets. Targets that do
    /// not hold the document count as missing, not as failures.
    #[instrument(skip(self, item), fields(kind = %item.kind()))]
    pub async fn delete(&self, item: &ContentItem) -> Result<FanoutReport, IndexingError> {
        let builder = self.builders.create(item)?;

        let (Some(id), Some(kind)) = (builder.get_id(item), builder.get_kind(item)) else {
            debug!("Item has no id, nothing to delete");
            return Ok(FanoutReport::default());
        };

        let visibilities: &[Visibility] = if builder.is_private(item) {
            &[Visibility::Private]
        } else {
            &Visibility::ALL
        };

        Ok(self.delete_from(&id, &kind, visibilities).await)
    }

    /// Bring the index in line with an item's current lifecycle status.
    ///
    /// Posts outside the publishable statuses are deleted, everything else
    /// is upserted. Posts that turned private are also removed from public
    /// targets.
    pub async fn sync(
        &self,
        item: &ContentItem,
        is_new: bool,
    ) -> Result<FanoutReport, IndexingError> {
        let ContentItem::Post(post) = item else {
            return self.upsert(item, is_new).await;
        };

        if !post.is_publishable() {
            return self.delete(item).await;
        }

        let mut report = self.upsert(item, is_new).await?;

        let builder = self.builders.create(item)?;
        if !is_new && builder.is_private(item) {
            if let (Some(id), Some(kind)) = (builder.get_id(item), builder.get_kind(item)) {
                report.merge(self.delete_from(&id, &kind, &[Visibility::Public]).await);
            }
        }

        Ok(report)
    }

    /// Apply a processed lifecycle event.
    pub async fn apply(&self, action: &SyncAction) -> Result<FanoutReport, IndexingError> {
        match action {
            SyncAction::Sync { item, is_new } => self.sync(item, *is_new).await,
            SyncAction::Delete(item) => self.delete(item).await,
            SyncAction::Skip => Ok(FanoutReport::default()),
        }
    }

    async fn delete_from(&self, id: &str, kind: &str, visibilities: &[Visibility]) -> FanoutReport {
        let mut report = FanoutReport::default();
        let mut targets = Vec::new();
        for generation in Generation::ALL {
            for &visibility in visibilities {
                match self.types.resolve(kind, visibility, generation) {
                    Some(target) => targets.push(target),
                    None => report.skipped += 1,
                }
            }
        }

        let results = join_all(targets.iter().map(|target| {
            let document_id = target.document_id(id);
            async move {
                let result = self
                    .provider
                    .delete_document(&target.index, &document_id)
                    .await;
                (target, document_id, result)
            }
        }))
        .await;

        for (target, document_id, result) in results {
            match result {
                Ok(DeleteOutcome::Deleted) => report.deleted += 1,
                Ok(DeleteOutcome::Missing) => report.missing += 1,
                Err(error) => {
                    warn!(
                        index = %target.index,
                        doc_id = %document_id,
                        error = %error,
                        "Failed to delete document"
                    );
                    report.failures.push(TargetFailure {
                        index: target.index.clone(),
                        document_id,
                        error,
                    });
                }
            }
        }

        debug!(
            id = %id,
            deleted = report.deleted,
            missing = report.missing,
            failed = report.failures.len(),
            "Delete fan-out finished"
        );
        report
    }
}
