//! Resumable bulk indexing.
//!
//! A bulk reindex walks every site's content one page per [`BulkIndexer::step`]
//! call, first into the primary generation and then, when one is configured,
//! into the secondary generation. Progress is persisted after every step so
//! that the walk survives restarts. Callers pace the walk and must not run
//! two steps concurrently.

use std::sync::Arc;

use content_index_repository::OptionsStore;
use content_index_shared::{Generation, ProgressState, ScopeProgress, SiteId, DEFAULT_SITE_ID};
use tracing::{debug, info, instrument, warn};

use crate::config::IndexerConfig;
use crate::errors::IndexingError;
use crate::indexer::Indexer;
use crate::sources::ContentSource;

/// Drives the bulk-indexing state machine.
pub struct BulkIndexer {
    indexer: Arc<Indexer>,
    content: Arc<dyn ContentSource>,
    options: Arc<dyn OptionsStore>,
    posts_per_page: u64,
    progress_key: String,
    multisite: bool,
    has_secondary: bool,
}

impl BulkIndexer {
    pub fn new(
        indexer: Arc<Indexer>,
        content: Arc<dyn ContentSource>,
        options: Arc<dyn OptionsStore>,
        config: &IndexerConfig,
    ) -> Self {
        Self {
            indexer,
            content,
            options,
            posts_per_page: config.posts_per_page,
            progress_key: config.progress_key.clone(),
            multisite: config.multisite,
            has_secondary: config.has_secondary(),
        }
    }

    /// The persisted progress, if any.
    pub async fn load_state(&self) -> Result<Option<ProgressState>, IndexingError> {
        match self.options.get(&self.progress_key).await? {
            None => Ok(None),
            Some(value) if value.is_null() => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                IndexingError::progress_state(format!(
                    "Invalid progress under '{}': {}",
                    self.progress_key, e
                ))
            }),
        }
    }

    async fn save_state(&self, state: &ProgressState) -> Result<(), IndexingError> {
        let value = serde_json::to_value(state)
            .map_err(|e| IndexingError::progress_state(e.to_string()))?;
        self.options.set(&self.progress_key, value).await?;
        Ok(())
    }

    async fn sites(&self) -> Result<Vec<SiteId>, IndexingError> {
        if !self.multisite {
            return Ok(vec![DEFAULT_SITE_ID]);
        }
        let mut sites: Vec<SiteId> = self
            .content
            .list_sites()
            .await?
            .into_iter()
            .map(|site| site.site_id)
            .collect();
        sites.sort_unstable();
        sites.dedup();
        Ok(sites)
    }

    async fn initialise(&self) -> Result<ProgressState, IndexingError> {
        let mut state = ProgressState::new();
        for site in self.sites().await? {
            let total = self.content.count_content(site).await?;
            state.insert(ScopeProgress::new(site, total));
        }

        info!(scopes = state.len(), "Bulk indexing initialised");
        Ok(state)
    }

    /// The scope to work on next, rolling a finished primary scope over to
    /// the secondary generation when there is one.
    fn select_scope(&self, state: &mut ProgressState) -> Option<ScopeProgress> {
        if let Some(scope) = state.scopes().find(|scope| !scope.is_exhausted()) {
            return Some(*scope);
        }
        if !self.has_secondary {
            return None;
        }

        let site = state
            .scopes()
            .find(|scope| scope.generation.is_primary())?
            .blog_id;
        let scope = state.get_mut(site)?;
        scope.rollover();
        info!(site = site, total = scope.total, "Rolling over to the secondary generation");
        Some(*scope)
    }

    /// Whether a state has reached its terminal fixed point.
    pub fn is_finished(&self, state: &ProgressState) -> bool {
        state.scopes().all(|scope| {
            scope.is_exhausted() && (!self.has_secondary || !scope.generation.is_primary())
        })
    }

    /// Index one page of content.
    ///
    /// # Arguments
    ///
    /// * `fresh` - Discard any persisted progress and start over
    ///
    /// # Returns
    ///
    /// * `Ok(ProgressState)` - The progress after this step. Once every scope
    ///   is done the state is returned unchanged and nothing is written.
    /// * `Err(IndexingError)` - If the content source or options store fail
    #[instrument(skip(self))]
    pub async fn step(&self, fresh: bool) -> Result<ProgressState, IndexingError> {
        let stored = if fresh { None } else { self.load_state().await? };
        let mut state = match stored {
            Some(state) if !state.is_empty() => state,
            _ => {
                let state = self.initialise().await?;
                self.save_state(&state).await?;
                state
            }
        };

        let Some(scope) = self.select_scope(&mut state) else {
            debug!("Bulk indexing is complete");
            return Ok(state);
        };
        let site = scope.blog_id;

        let items = self
            .content
            .list_content(site, scope.page, self.posts_per_page)
            .await?;

        let mut successes = 0u64;
        for item in &items {
            match self.indexer.upsert_into(item, false, scope.generation).await {
                Ok(report) if report.is_success() => successes += 1,
                Ok(report) => warn!(
                    site = site,
                    kind = %item.kind(),
                    failed_targets = report.failures.len(),
                    "Item was not fully indexed"
                ),
                Err(e) => warn!(site = site, error = %e, "Item could not be indexed"),
            }
        }

        if let Some(scope) = state.get_mut(site) {
            scope.advance(successes);
            if items.is_empty() {
                scope.exhaust();
            }
            info!(
                site = site,
                generation = %scope.generation,
                page = scope.page,
                count = scope.count,
                total = scope.total,
                "Indexed page"
            );
        }

        self.save_state(&state).await?;
        Ok(state)
    }

    /// Upsert every term of every site into one generation.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of terms indexed without failure
    /// * `Err(IndexingError)` - If the content source fails
    #[instrument(skip(self))]
    pub async fn index_taxonomies(&self, generation: Generation) -> Result<usize, IndexingError> {
        let mut successes = 0;
        for site in self.sites().await? {
            for term in self.content.list_terms(site).await? {
                match self.indexer.upsert_into(&term, false, generation).await {
                    Ok(report) if report.is_success() => successes += 1,
                    Ok(report) => warn!(
                        site = site,
                        failed_targets = report.failures.len(),
                        "Term was not fully indexed"
                    ),
                    Err(e) => warn!(site = site, error = %e, "Term could not be indexed"),
                }
            }
        }

        info!(generation = %generation, count = successes, "Indexed taxonomies");
        Ok(successes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SnapshotSource;
    use async_trait::async_trait;
    use content_index_repository::{
        DeleteOutcome, IndexMetadata, MemoryOptionsStore, SearchIndexError, SearchIndexProvider,
    };
    use content_index_shared::{Post, Site, Visibility};
    use serde_json::{json, Value};

    struct NullProvider;

    #[async_trait]
    impl SearchIndexProvider for NullProvider {
        async fn create_index(
            &self,
            name: &str,
            _settings: &Value,
        ) -> Result<IndexMetadata, SearchIndexError> {
            Ok(IndexMetadata::from_response(name, &Value::Null))
        }

        async fn delete_index(&self, _name: &str) -> Result<DeleteOutcome, SearchIndexError> {
            Ok(DeleteOutcome::Missing)
        }

        async fn put_mapping(&self, _name: &str, _properties: &Value) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn upsert_document(
            &self,
            _index: &str,
            _id: &str,
            _body: &Value,
        ) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn delete_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<DeleteOutcome, SearchIndexError> {
            Ok(DeleteOutcome::Missing)
        }
    }

    fn bulk(
        source: SnapshotSource,
        options: Arc<MemoryOptionsStore>,
        config: &IndexerConfig,
    ) -> BulkIndexer {
        let source = Arc::new(source);
        let indexer = Arc::new(Indexer::new(Arc::new(NullProvider), source.clone(), config));
        BulkIndexer::new(indexer, source, options, config)
    }

    fn posts(count: usize) -> Vec<Post> {
        (1..=count)
            .map(|id| Post::new(id.to_string(), "post", "publish"))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_site_without_secondary() {
        let options = Arc::new(MemoryOptionsStore::new());
        let bulk = bulk(SnapshotSource::default(), options, &IndexerConfig::default());

        let state = bulk.step(true).await.unwrap();
        let scope = state.single().unwrap();
        assert_eq!((scope.page, scope.count, scope.total), (1, 0, 0));
        assert_eq!(scope.generation, Generation::Primary);
    }

    #[tokio::test]
    async fn test_empty_site_rolls_over_once() {
        let options = Arc::new(MemoryOptionsStore::new());
        let config = IndexerConfig::default().with_index(
            Generation::Secondary,
            Visibility::Public,
            "content_secondary",
        );
        let bulk = bulk(SnapshotSource::default(), options, &config);

        let state = bulk.step(true).await.unwrap();
        let scope = state.single().unwrap();
        assert_eq!((scope.page, scope.count, scope.total), (2, 0, 0));
        assert_eq!(scope.generation, Generation::Secondary);

        let again = bulk.step(false).await.unwrap();
        assert_eq!(again, state);
        assert!(again.is_complete());
        assert!(bulk.is_finished(&again));
    }

    #[tokio::test]
    async fn test_walks_pages_and_persists() {
        let options = Arc::new(MemoryOptionsStore::new());
        let config = IndexerConfig::default().with_posts_per_page(10);
        let bulk = bulk(
            SnapshotSource::default().with_posts(posts(25)),
            options.clone(),
            &config,
        );

        let first = bulk.step(true).await.unwrap();
        assert_eq!(first.single().unwrap().count, 10);

        let second = bulk.step(false).await.unwrap();
        let third = bulk.step(false).await.unwrap();
        assert_eq!(second.single().unwrap().count, 20);
        let scope = third.single().unwrap();
        assert_eq!((scope.page, scope.count, scope.total), (4, 25, 25));

        let stored = options.get(&config.progress_key).await.unwrap().unwrap();
        assert_eq!(stored["1"]["count"], json!(25));
        assert_eq!(stored["1"]["generation"], json!("primary"));
    }

    #[tokio::test]
    async fn test_malformed_progress_is_an_error() {
        let config = IndexerConfig::default();
        let options = Arc::new(MemoryOptionsStore::with_values([(
            config.progress_key.clone(),
            json!("not a state"),
        )]));
        let bulk = bulk(SnapshotSource::default(), options, &config);

        assert!(matches!(
            bulk.step(false).await,
            Err(IndexingError::ProgressStateError(_))
        ));
    }

    #[tokio::test]
    async fn test_multisite_scopes() {
        let options = Arc::new(MemoryOptionsStore::new());
        let config = IndexerConfig::default().with_multisite(true);
        let source = SnapshotSource::default()
            .with_sites([Site::new(3), Site::new(2)])
            .with_posts(vec![
                Post::new("1", "post", "publish").on_site(2),
                Post::new("2", "post", "publish").on_site(3),
                Post::new("3", "post", "publish").on_site(3),
            ]);
        let bulk = bulk(source, options, &config);

        let state = bulk.step(true).await.unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(state.get(2).unwrap().count, 1);
        assert_eq!(state.get(3).unwrap().count, 0);

        let state = bulk.step(false).await.unwrap();
        assert_eq!(state.get(3).unwrap().count, 2);
    }

    #[tokio::test]
    async fn test_multisite_walk_rolls_over_site_by_site() {
        use Generation::{Primary, Secondary};

        let options = Arc::new(MemoryOptionsStore::new());
        let config = IndexerConfig::default().with_multisite(true).with_index(
            Generation::Secondary,
            Visibility::Public,
            "content_secondary",
        );
        let source = SnapshotSource::default()
            .with_sites([Site::new(3), Site::new(2)])
            .with_posts(vec![
                Post::new("1", "post", "publish").on_site(2),
                Post::new("2", "post", "publish").on_site(3),
                Post::new("3", "post", "publish").on_site(3),
            ]);
        let bulk = bulk(source, options, &config);

        let scope = |state: &ProgressState, site: SiteId| {
            let scope = state.get(site).unwrap();
            (scope.page, scope.count, scope.total, scope.generation)
        };

        // Site 2 primary
        let state = bulk.step(true).await.unwrap();
        assert_eq!(scope(&state, 2), (2, 1, 1, Primary));
        assert_eq!(scope(&state, 3), (1, 0, 2, Primary));

        // Site 3 primary
        let state = bulk.step(false).await.unwrap();
        assert_eq!(scope(&state, 2), (2, 1, 1, Primary));
        assert_eq!(scope(&state, 3), (2, 2, 2, Primary));
        assert!(!bulk.is_finished(&state));

        // Site 2 rolls over first
        let state = bulk.step(false).await.unwrap();
        assert_eq!(scope(&state, 2), (2, 1, 1, Secondary));
        assert_eq!(scope(&state, 3), (2, 2, 2, Primary));

        // Then site 3
        let state = bulk.step(false).await.unwrap();
        assert_eq!(scope(&state, 2), (2, 1, 1, Secondary));
        assert_eq!(scope(&state, 3), (2, 2, 2, Secondary));
        assert!(state.is_complete());
        assert!(bulk.is_finished(&state));

        let terminal = bulk.step(false).await.unwrap();
        assert_eq!(terminal, state);
    }
}
