//! Integration tests for the content indexer.
//!
//! These tests wire the real indexer, bulk indexer and admin actions to a
//! snapshot content source and a mock SearchIndexProvider that records every
//! request.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use content_index_repository::{
    DeleteOutcome, FileOptionsStore, IndexMetadata, MemoryOptionsStore, OptionsStore,
    SearchIndexError, SearchIndexProvider,
};
use content_index_shared::{
    ContentItem, CustomField, Generation, Post, ProgressState, ScopeProgress, Site, SiteId, Term,
    Visibility,
};
use content_indexer::{
    AdminActions, BulkIndexer, ContentEvent, ContentSource, IndexAdministrator, Indexer,
    IndexerConfig, IndexingError, SnapshotSource,
};

// Mock SearchIndexProvider recording every request
#[derive(Default)]
struct MockSearchProvider {
    created: Mutex<Vec<String>>,
    mappings: Mutex<Vec<(String, Value)>>,
    upserts: Mutex<Vec<(String, String, Value)>>,
    deletes: Mutex<Vec<(String, String)>>,
    stored: Mutex<HashSet<(String, String)>>,
}

impl MockSearchProvider {
    fn upserts_into(&self, index: &str) -> Vec<String> {
        self.upserts
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _, _)| i == index)
            .map(|(_, id, _)| id.clone())
            .collect()
    }

    fn body(&self, index: &str, id: &str) -> Option<Value> {
        self.upserts
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(i, d, _)| i == index && d == id)
            .map(|(_, _, body)| body.clone())
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn create_index(
        &self,
        name: &str,
        _settings: &Value,
    ) -> Result<IndexMetadata, SearchIndexError> {
        self.created.lock().unwrap().push(name.to_string());
        Ok(IndexMetadata::from_response(
            name,
            &json!({ "acknowledged": true }),
        ))
    }

    async fn delete_index(&self, _name: &str) -> Result<DeleteOutcome, SearchIndexError> {
        Ok(DeleteOutcome::Missing)
    }

    async fn put_mapping(&self, name: &str, properties: &Value) -> Result<(), SearchIndexError> {
        self.mappings
            .lock()
            .unwrap()
            .push((name.to_string(), properties.clone()));
        Ok(())
    }

    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), SearchIndexError> {
        self.upserts
            .lock()
            .unwrap()
            .push((index.to_string(), id.to_string(), body.clone()));
        self.stored
            .lock()
            .unwrap()
            .insert((index.to_string(), id.to_string()));
        Ok(())
    }

    async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DeleteOutcome, SearchIndexError> {
        self.deletes
            .lock()
            .unwrap()
            .push((index.to_string(), id.to_string()));
        let removed = self
            .stored
            .lock()
            .unwrap()
            .remove(&(index.to_string(), id.to_string()));
        Ok(if removed {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Missing
        })
    }
}

// Content source recording the pages requested from it
struct RecordingSource {
    inner: SnapshotSource,
    pages: Mutex<Vec<(SiteId, u64)>>,
}

impl RecordingSource {
    fn new(inner: SnapshotSource) -> Self {
        Self {
            inner,
            pages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentSource for RecordingSource {
    async fn list_sites(&self) -> Result<Vec<Site>, IndexingError> {
        self.inner.list_sites().await
    }

    async fn count_content(&self, site: SiteId) -> Result<u64, IndexingError> {
        self.inner.count_content(site).await
    }

    async fn list_content(
        &self,
        site: SiteId,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<ContentItem>, IndexingError> {
        self.pages.lock().unwrap().push((site, page));
        self.inner.list_content(site, page, per_page).await
    }

    async fn list_terms(&self, site: SiteId) -> Result<Vec<ContentItem>, IndexingError> {
        self.inner.list_terms(site).await
    }
}

fn full_config() -> IndexerConfig {
    IndexerConfig::default()
        .with_index(Generation::Primary, Visibility::Public, "public_primary")
        .with_index(Generation::Secondary, Visibility::Public, "public_secondary")
        .with_index(Generation::Primary, Visibility::Private, "private_primary")
        .with_index(Generation::Secondary, Visibility::Private, "private_secondary")
}

fn posts(count: usize) -> Vec<Post> {
    (1..=count)
        .map(|id| Post::new(id.to_string(), "article", "publish").with_title(format!("Post {}", id)))
        .collect()
}

struct Harness {
    provider: Arc<MockSearchProvider>,
    source: Arc<RecordingSource>,
    options: Arc<dyn OptionsStore>,
    indexer: Arc<Indexer>,
    bulk: Arc<BulkIndexer>,
    actions: AdminActions,
}

fn harness(snapshot: SnapshotSource, options: Arc<dyn OptionsStore>, config: &IndexerConfig) -> Harness {
    let provider = Arc::new(MockSearchProvider::default());
    let schema = Arc::new(snapshot.clone());
    let source = Arc::new(RecordingSource::new(snapshot));

    let indexer = Arc::new(Indexer::new(provider.clone(), schema.clone(), config));
    let bulk = Arc::new(BulkIndexer::new(
        indexer.clone(),
        source.clone(),
        options.clone(),
        config,
    ));
    let admin = IndexAdministrator::new(provider.clone(), schema);
    let actions = AdminActions::new(admin, indexer.clone(), bulk.clone(), config.indices.clone());

    Harness {
        provider,
        source,
        options,
        indexer,
        bulk,
        actions,
    }
}

async fn store_progress(options: &dyn OptionsStore, key: &str, scope: ScopeProgress) {
    let state: ProgressState = [scope].into_iter().collect();
    options
        .set(key, serde_json::to_value(state).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bulk_step_resumes_from_stored_page() {
    let config = full_config().with_posts_per_page(20);
    let h = harness(
        SnapshotSource::default().with_posts(posts(100)),
        Arc::new(MemoryOptionsStore::new()),
        &config,
    );
    store_progress(
        h.options.as_ref(),
        &config.progress_key,
        ScopeProgress {
            blog_id: 1,
            page: 3,
            count: 40,
            total: 100,
            generation: Generation::Primary,
        },
    )
    .await;

    let state = h.bulk.step(false).await.unwrap();

    assert_eq!(*h.source.pages.lock().unwrap(), vec![(1, 3)]);
    let scope = state.single().unwrap();
    assert_eq!((scope.page, scope.count, scope.total), (4, 60, 100));
    assert_eq!(scope.generation, Generation::Primary);

    // Page 3 holds posts 41 to 60
    let written = h.provider.upserts_into("public_primary");
    assert_eq!(written.len(), 20);
    assert!(written.contains(&"article_41".to_string()));
    assert!(written.contains(&"article_60".to_string()));
    assert!(h.provider.upserts_into("public_secondary").is_empty());
}

#[tokio::test]
async fn test_bulk_step_rolls_over_to_secondary() {
    let config = full_config().with_posts_per_page(10);
    let h = harness(
        SnapshotSource::default().with_posts(posts(5)),
        Arc::new(MemoryOptionsStore::new()),
        &config,
    );
    store_progress(
        h.options.as_ref(),
        &config.progress_key,
        ScopeProgress {
            blog_id: 1,
            page: 2,
            count: 5,
            total: 5,
            generation: Generation::Primary,
        },
    )
    .await;

    let state = h.bulk.step(false).await.unwrap();

    // The walk restarts at page 1 of the secondary generation
    assert_eq!(*h.source.pages.lock().unwrap(), vec![(1, 1)]);
    let scope = state.single().unwrap();
    assert_eq!(scope.generation, Generation::Secondary);
    assert_eq!((scope.page, scope.count, scope.total), (2, 5, 5));
    assert_eq!(h.provider.upserts_into("public_secondary").len(), 5);
    assert!(h.provider.upserts_into("public_primary").is_empty());
}

#[tokio::test]
async fn test_bulk_terminal_state_is_a_fixed_point() {
    let config = full_config();
    let h = harness(
        SnapshotSource::default().with_posts(posts(3)),
        Arc::new(MemoryOptionsStore::new()),
        &config,
    );
    let done = ScopeProgress {
        blog_id: 1,
        page: 2,
        count: 3,
        total: 3,
        generation: Generation::Secondary,
    };
    store_progress(h.options.as_ref(), &config.progress_key, done).await;
    let before = h.options.get(&config.progress_key).await.unwrap();

    let first = h.bulk.step(false).await.unwrap();
    let second = h.bulk.step(false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.single(), Some(&done));
    assert!(h.source.pages.lock().unwrap().is_empty());
    assert!(h.provider.upserts.lock().unwrap().is_empty());
    assert_eq!(h.options.get(&config.progress_key).await.unwrap(), before);
}

#[tokio::test]
async fn test_bulk_empty_page_exhausts_scope() {
    let config = IndexerConfig::default().with_posts_per_page(10);
    let h = harness(
        SnapshotSource::default().with_posts(posts(5)),
        Arc::new(MemoryOptionsStore::new()),
        &config,
    );
    // Stored total is stale: only 5 posts remain
    store_progress(
        h.options.as_ref(),
        &config.progress_key,
        ScopeProgress {
            blog_id: 1,
            page: 2,
            count: 5,
            total: 8,
            generation: Generation::Primary,
        },
    )
    .await;

    let state = h.bulk.step(false).await.unwrap();
    let scope = state.single().unwrap();
    assert_eq!((scope.page, scope.count), (3, 8));

    let again = h.bulk.step(false).await.unwrap();
    assert_eq!(again, state);
}

#[tokio::test]
async fn test_full_walk_through_actions_with_file_options() {
    let dir = tempfile::tempdir().unwrap();
    let options: Arc<dyn OptionsStore> = Arc::new(FileOptionsStore::new(dir.path().join("options.json")));
    let config = full_config().with_posts_per_page(2);
    let h = harness(
        SnapshotSource::default()
            .with_posts(posts(3))
            .with_terms(vec![Term::new("9", "category", "News", "news")]),
        options,
        &config,
    );

    let mut steps = 0;
    let mut response = h.actions.index_posts(true).await;
    while response.message != "Posts were indexed completely" {
        assert!(response.is_success(), "{:?}", response.errors);
        steps += 1;
        assert!(steps < 10, "walk did not terminate");
        response = h.actions.index_posts(false).await;
    }

    let status = response.status.unwrap();
    assert!(status.is_complete());
    assert_eq!(h.provider.upserts_into("public_primary").len(), 3);
    assert_eq!(h.provider.upserts_into("public_secondary").len(), 3);
    assert_eq!(h.provider.upserts_into("private_secondary").len(), 3);

    let taxonomies = h.actions.index_taxonomies().await;
    assert_eq!(taxonomies.count, Some(2));
    assert!(h
        .provider
        .upserts_into("public_secondary")
        .contains(&"category_9".to_string()));

    // A fresh start discards the stored progress
    let restarted = h.actions.index_posts(true).await;
    let scope = *restarted.status.unwrap().single().unwrap();
    assert_eq!(scope.generation, Generation::Primary);
    assert_eq!((scope.page, scope.count), (2, 2));
}

#[tokio::test]
async fn test_public_and_private_documents_match_without_private_fields() {
    let config = full_config();
    let h = harness(SnapshotSource::default(), Arc::new(MemoryOptionsStore::new()), &config);

    let item: ContentItem = Post::new("5", "post", "publish")
        .with_title("Hi")
        .with_content("<p>Body</p>")
        .into();
    let report = h.indexer.upsert(&item, false).await.unwrap();

    assert_eq!(report.written, 2);
    let public = h.provider.body("public_primary", "post_5").unwrap();
    let private = h.provider.body("private_primary", "post_5").unwrap();
    assert_eq!(public, private);
    assert_eq!(public["post_content"], json!("Body"));
}

#[tokio::test]
async fn test_private_fields_stay_out_of_public_index() {
    let config = full_config().with_private_fields(["salary"]);
    let snapshot = SnapshotSource::default().with_field_groups(
        "staff",
        vec![
            CustomField::new("role", "text"),
            CustomField::new("salary", "number"),
        ],
    );
    let h = harness(snapshot, Arc::new(MemoryOptionsStore::new()), &config);

    let item: ContentItem = Post::new("3", "staff", "publish")
        .with_field("role", json!("Editor"))
        .with_field("salary", json!(50000))
        .into();
    h.indexer.upsert(&item, false).await.unwrap();

    let public = h.provider.body("public_primary", "staff_3").unwrap();
    let private = h.provider.body("private_primary", "staff_3").unwrap();
    assert!(public.get("salary").is_none());
    assert_eq!(private["salary"], json!(50000));
    assert_eq!(public["role"], private["role"]);
}

#[tokio::test]
async fn test_fan_out_target_counts() {
    let config = full_config();
    let h = harness(SnapshotSource::default(), Arc::new(MemoryOptionsStore::new()), &config);

    let public: ContentItem = Post::new("1", "post", "publish").into();
    let report = h.indexer.upsert(&public, true).await.unwrap();
    assert_eq!(report.attempted(), 4);

    let private: ContentItem = Post::new("2", "post", "private").into();
    let report = h.indexer.upsert(&private, true).await.unwrap();
    assert_eq!(report.attempted(), 2);
    assert!(h.provider.upserts_into("public_primary").iter().all(|id| id != "post_2"));
    assert!(h.provider.upserts_into("public_secondary").iter().all(|id| id != "post_2"));
}

#[tokio::test]
async fn test_delete_twice_is_safe() {
    let config = full_config();
    let h = harness(SnapshotSource::default(), Arc::new(MemoryOptionsStore::new()), &config);
    let item: ContentItem = Post::new("1", "post", "publish").into();
    h.indexer.upsert(&item, true).await.unwrap();

    let first = h.indexer.delete(&item).await.unwrap();
    let second = h.indexer.delete(&item).await.unwrap();

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(second.missing, 4);
    assert!(h.provider.stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_draft_event_only_deletes() {
    let config = full_config();
    let h = harness(SnapshotSource::default(), Arc::new(MemoryOptionsStore::new()), &config);

    let response = h
        .actions
        .apply_events(vec![ContentEvent::Saved {
            post: Post::new("42", "article", "draft"),
            is_new: false,
        }])
        .await;

    assert!(response.is_success());
    assert!(h.provider.upserts.lock().unwrap().is_empty());
    let deletes = h.provider.deletes.lock().unwrap();
    assert_eq!(deletes.len(), 4);
    assert!(deletes.iter().all(|(_, id)| id == "article_42"));
}

#[tokio::test]
async fn test_repeater_indexed_as_nested() {
    let config = full_config();
    let snapshot = SnapshotSource::default()
        .with_posts(posts(1))
        .with_field_groups(
            "article",
            vec![CustomField::repeater(
                "gallery",
                vec![CustomField::new("caption", "text")],
            )],
        );
    let h = harness(snapshot, Arc::new(MemoryOptionsStore::new()), &config);

    let mappings = h.actions.create_mappings().await;
    assert!(mappings.is_success(), "{:?}", mappings.errors);
    assert_eq!(h.provider.created.lock().unwrap().len(), 4);

    let recorded = h.provider.mappings.lock().unwrap();
    let (_, properties) = &recorded[0];
    assert_eq!(
        properties["gallery"],
        json!({ "type": "nested", "properties": { "caption": { "type": "text" } } })
    );
    drop(recorded);

    let item: ContentItem = Post::new("1", "article", "publish")
        .with_field("gallery", json!([{ "caption": "Sunset" }]))
        .into();
    h.indexer.upsert(&item, false).await.unwrap();
    let body = h.provider.body("public_primary", "article_1").unwrap();
    assert_eq!(body["gallery"], json!([{ "caption": "Sunset" }]));
}

#[tokio::test]
async fn test_clear_index_reports_every_index() {
    let config = full_config();
    let h = harness(SnapshotSource::default(), Arc::new(MemoryOptionsStore::new()), &config);

    let response = h.actions.clear_index().await;
    assert!(response.is_success());
    assert_eq!(response.message, "Index was cleared successfully");
}
