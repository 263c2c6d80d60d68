//! Index lifecycle: creation with analysis settings, mapping installation and
//! deletion.

use std::sync::Arc;

use content_index_repository::{DeleteOutcome, IndexMetadata, IndexSettings, SearchIndexProvider};
use tracing::{info, instrument, warn};

use crate::errors::IndexingError;
use crate::mapping::{MappingBuilder, PostMappingBuilder, Schema, TermMappingBuilder};
use crate::sources::SchemaSource;

/// Creates, maps and clears content indices.
pub struct IndexAdministrator {
    provider: Arc<dyn SearchIndexProvider>,
    schema_source: Arc<dyn SchemaSource>,
    settings: IndexSettings,
}

impl IndexAdministrator {
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        schema_source: Arc<dyn SchemaSource>,
    ) -> Self {
        Self {
            provider,
            schema_source,
            settings: IndexSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: IndexSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Recreate an index from scratch.
    ///
    /// Any existing index of that name is deleted first. A failed pre-delete
    /// is logged and creation is attempted anyway.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexMetadata)` - The creation response
    /// * `Err(IndexingError)` - If the index could not be created
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<IndexMetadata, IndexingError> {
        match self.provider.delete_index(name).await {
            Ok(DeleteOutcome::Deleted) => info!(index = %name, "Deleted existing index"),
            Ok(DeleteOutcome::Missing) => {}
            Err(e) => warn!(index = %name, error = %e, "Failed to delete existing index"),
        }

        let metadata = self
            .provider
            .create_index(name, &self.settings.body())
            .await?;

        info!(
            index = %name,
            acknowledged = metadata.acknowledged,
            "Index ready"
        );
        Ok(metadata)
    }

    /// Delete an index. A missing index is not an error.
    #[instrument(skip(self))]
    pub async fn clear(&self, name: &str) -> Result<DeleteOutcome, IndexingError> {
        let outcome = self.provider.delete_index(name).await?;
        if outcome.is_missing() {
            info!(index = %name, "Index to clear does not exist");
        }
        Ok(outcome)
    }

    /// The merged schema of every indexed post kind and taxonomy.
    pub fn merged_schema(&self) -> Schema {
        let posts = PostMappingBuilder::new(Arc::clone(&self.schema_source));
        let terms = TermMappingBuilder::new();

        let mut schema = Schema::new();
        for kind in self.schema_source.post_kinds() {
            if let Some(kind_schema) = posts.build(&kind) {
                schema.merge(kind_schema);
            }
        }
        for taxonomy in self.schema_source.taxonomy_kinds() {
            if let Some(term_schema) = terms.build(&taxonomy) {
                schema.merge(term_schema);
            }
        }
        schema
    }

    /// Install the merged mapping of every kind on an index.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of mapped fields
    /// * `Err(IndexingError)` - If the mapping was rejected
    #[instrument(skip(self))]
    pub async fn put_mappings(&self, name: &str) -> Result<usize, IndexingError> {
        let schema = self.merged_schema();
        if schema.is_empty() {
            return Ok(0);
        }

        self.provider
            .put_mapping(name, &schema.to_mapping())
            .await?;

        info!(index = %name, fields = schema.len(), "Mappings installed");
        Ok(schema.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SnapshotSource;
    use async_trait::async_trait;
    use content_index_repository::{IndexOperation, SearchIndexError};
    use content_index_shared::CustomField;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Provider recording index lifecycle calls.
    struct MockProvider {
        calls: Mutex<Vec<String>>,
        mappings: Mutex<Vec<Value>>,
        delete_result: fn() -> Result<DeleteOutcome, SearchIndexError>,
        create_fails: bool,
    }

    impl MockProvider {
        fn new(delete_result: fn() -> Result<DeleteOutcome, SearchIndexError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                mappings: Mutex::new(Vec::new()),
                delete_result,
                create_fails: false,
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn create_index(
            &self,
            name: &str,
            settings: &Value,
        ) -> Result<IndexMetadata, SearchIndexError> {
            self.calls.lock().unwrap().push(format!("create {}", name));
            if self.create_fails {
                return Err(SearchIndexError::rejected(
                    IndexOperation::CreateIndex,
                    name,
                    "Mock create failure",
                ));
            }
            assert!(settings["settings"]["analysis"]["analyzer"]["ngram_analyzer"].is_object());
            Ok(IndexMetadata::from_response(
                name,
                &json!({ "acknowledged": true, "shards_acknowledged": true, "index": name }),
            ))
        }

        async fn delete_index(&self, name: &str) -> Result<DeleteOutcome, SearchIndexError> {
            self.calls.lock().unwrap().push(format!("delete {}", name));
            (self.delete_result)()
        }

        async fn put_mapping(&self, name: &str, properties: &Value) -> Result<(), SearchIndexError> {
            self.calls.lock().unwrap().push(format!("mapping {}", name));
            self.mappings.lock().unwrap().push(properties.clone());
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

    fn admin(provider: Arc<MockProvider>, source: SnapshotSource) -> IndexAdministrator {
        IndexAdministrator::new(provider, Arc::new(source))
    }

    #[tokio::test]
    async fn test_create_deletes_first() {
        let provider = Arc::new(MockProvider::new(|| Ok(DeleteOutcome::Deleted)));
        let admin = admin(provider.clone(), SnapshotSource::default());

        let metadata = admin.create("content_primary").await.unwrap();

        assert!(metadata.acknowledged);
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["delete content_primary", "create content_primary"]
        );
    }

    #[tokio::test]
    async fn test_create_ignores_failed_pre_delete() {
        let provider = Arc::new(MockProvider::new(|| {
            Err(SearchIndexError::rejected(
                IndexOperation::DeleteIndex,
                "content",
                "Mock delete failure",
            ))
        }));
        let admin = admin(provider.clone(), SnapshotSource::default());

        assert!(admin.create("content_primary").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_failure_is_surfaced() {
        let provider = Arc::new(MockProvider {
            create_fails: true,
            ..MockProvider::new(|| Ok(DeleteOutcome::Missing))
        });
        let admin = admin(provider, SnapshotSource::default());

        let result = admin.create("content_primary").await;
        assert!(matches!(
            result,
            Err(IndexingError::SearchIndex(SearchIndexError::Rejected {
                operation: IndexOperation::CreateIndex,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_clear_missing_index() {
        let provider = Arc::new(MockProvider::new(|| Ok(DeleteOutcome::Missing)));
        let admin = admin(provider, SnapshotSource::default());

        assert_eq!(
            admin.clear("content_primary").await.unwrap(),
            DeleteOutcome::Missing
        );
    }

    #[tokio::test]
    async fn test_clear_surfaces_other_errors() {
        let provider = Arc::new(MockProvider::new(|| {
            Err(SearchIndexError::unreachable("Mock connection failure"))
        }));
        let admin = admin(provider, SnapshotSource::default());

        assert!(admin.clear("content_primary").await.is_err());
    }

    #[tokio::test]
    async fn test_put_mappings_merges_kinds() {
        let provider = Arc::new(MockProvider::new(|| Ok(DeleteOutcome::Missing)));
        let source = SnapshotSource::default()
            .with_taxonomies("article", ["category"])
            .with_field_groups("event", vec![CustomField::new("capacity", "number")])
            .with_taxonomies("event", Vec::<String>::new());
        let admin = admin(provider.clone(), source);

        let fields = admin.put_mappings("content_primary").await.unwrap();

        let mappings = provider.mappings.lock().unwrap();
        let properties = &mappings[0];
        assert_eq!(fields, properties.as_object().unwrap().len());
        assert_eq!(properties["capacity"]["type"], "long");
        assert_eq!(properties["category"]["type"], "keyword");
        assert_eq!(properties["name_suggest"]["analyzer"], "ngram_analyzer");
        assert_eq!(properties["post_title"]["type"], "text");
    }
}
