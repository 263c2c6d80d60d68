//! Dependency initialization and wiring for the content indexer.

use std::path::Path;
use std::sync::Arc;

use content_index_repository::{FileOptionsStore, OpenSearchProvider, SearchIndexProvider};
use tracing::info;

use super::IndexerConfig;
use crate::actions::AdminActions;
use crate::admin::IndexAdministrator;
use crate::errors::IndexingError;
use crate::indexer::Indexer;
use crate::progress::BulkIndexer;
use crate::sources::SnapshotSource;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The effective configuration.
    pub config: IndexerConfig,
    /// The operator actions ready to run.
    pub actions: AdminActions,
}

impl Dependencies {
    /// Initialize all dependencies.
    ///
    /// The configuration is read from the environment and then overlaid with
    /// the options persisted in the options file.
    ///
    /// # Arguments
    ///
    /// * `snapshot_path` - JSON export of the host's content
    /// * `options_path` - JSON options file, also holding bulk-indexing progress
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If configuration, snapshot or client setup fails
    pub async fn new(snapshot_path: &Path, options_path: &Path) -> Result<Self, IndexingError> {
        let options = Arc::new(FileOptionsStore::new(options_path));
        let config = IndexerConfig::from_env()?
            .with_options(options.as_ref())
            .await?;

        info!(
            opensearch_url = %config.server_url,
            indices = ?config.indices.configured(),
            posts_per_page = config.posts_per_page,
            multisite = config.multisite,
            options_path = %options_path.display(),
            "Initializing dependencies"
        );

        let source = Arc::new(SnapshotSource::load(snapshot_path).await?);

        let provider: Arc<dyn SearchIndexProvider> = Arc::new(
            OpenSearchProvider::new(&config.server_url, config.timeout)
                .await
                .map_err(|e| {
                    IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
                })?,
        );

        let indexer = Arc::new(Indexer::new(provider.clone(), source.clone(), &config));
        let bulk = Arc::new(BulkIndexer::new(
            indexer.clone(),
            source.clone(),
            options,
            &config,
        ));
        let admin = IndexAdministrator::new(provider, source);
        let actions = AdminActions::new(admin, indexer, bulk, config.indices.clone());

        Ok(Self { config, actions })
    }
}
