//! Content and schema source backed by a JSON snapshot of the host.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use async_trait::async_trait;
use content_index_shared::{
    ContentItem, CustomField, Post, Site, SiteId, Term, DEFAULT_SITE_ID,
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use super::{ContentSource, SchemaSource};
use crate::errors::IndexingError;
use crate::mapping::{is_indexable_post_kind, is_indexable_taxonomy};

/// Export of the host's content and registered kinds.
///
/// # Example
///
/// ```json
/// {
///   "posts": [{ "id": "42", "post_type": "article", "status": "publish", "title": "Hello" }],
///   "terms": [{ "term_id": "7", "taxonomy": "category", "name": "News", "slug": "news" }],
///   "taxonomies": { "article": ["category"] },
///   "field_groups": { "article": [{ "name": "subtitle", "type": "text" }] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSnapshot {
    /// Sites of a multi-tenant deployment. Empty means the single default site.
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub terms: Vec<Term>,
    /// Registered post kinds. Empty means the kinds of the snapshot's posts.
    #[serde(default)]
    pub post_kinds: Vec<String>,
    /// Taxonomies attached to each post kind.
    #[serde(default)]
    pub taxonomies: BTreeMap<String, Vec<String>>,
    /// Custom fields of each post kind. Absent when the host has no
    /// custom-field system.
    #[serde(default)]
    pub field_groups: Option<BTreeMap<String, Vec<CustomField>>>,
}

/// [`ContentSource`] and [`SchemaSource`] over a [`ContentSnapshot`].
///
/// Items are listed in snapshot order.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: ContentSnapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: ContentSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, IndexingError> {
        let path = path.as_ref();
        let raw = fs::read(path).await.map_err(|e| {
            IndexingError::content_source(format!(
                "Failed to read snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        let snapshot: ContentSnapshot = serde_json::from_slice(&raw).map_err(|e| {
            IndexingError::content_source(format!(
                "Failed to parse snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            path = %path.display(),
            posts = snapshot.posts.len(),
            terms = snapshot.terms.len(),
            sites = snapshot.sites.len(),
            "Content snapshot loaded"
        );

        Ok(Self::new(snapshot))
    }

    pub fn with_sites(mut self, sites: impl IntoIterator<Item = Site>) -> Self {
        self.snapshot.sites.extend(sites);
        self
    }

    pub fn with_posts(mut self, posts: impl IntoIterator<Item = Post>) -> Self {
        self.snapshot.posts.extend(posts);
        self
    }

    pub fn with_terms(mut self, terms: impl IntoIterator<Item = Term>) -> Self {
        self.snapshot.terms.extend(terms);
        self
    }

    pub fn with_taxonomies<S: Into<String>>(
        mut self,
        post_kind: impl Into<String>,
        taxonomies: impl IntoIterator<Item = S>,
    ) -> Self {
        self.snapshot
            .taxonomies
            .entry(post_kind.into())
            .or_default()
            .extend(taxonomies.into_iter().map(Into::into));
        self
    }

    pub fn with_field_groups(mut self, post_kind: impl Into<String>, fields: Vec<CustomField>) -> Self {
        self.snapshot
            .field_groups
            .get_or_insert_with(BTreeMap::new)
            .entry(post_kind.into())
            .or_default()
            .extend(fields);
        self
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.snapshot
    }

    fn indexable_posts(&self, site: SiteId) -> impl Iterator<Item = &Post> {
        self.snapshot.posts.iter().filter(move |post| {
            post.site_id == site && post.is_publishable() && is_indexable_post_kind(&post.post_type)
        })
    }
}

#[async_trait]
impl ContentSource for SnapshotSource {
    async fn list_sites(&self) -> Result<Vec<Site>, IndexingError> {
        if self.snapshot.sites.is_empty() {
            return Ok(vec![Site::new(DEFAULT_SITE_ID)]);
        }
        Ok(self.snapshot.sites.clone())
    }

    async fn count_content(&self, site: SiteId) -> Result<u64, IndexingError> {
        Ok(self.indexable_posts(site).count() as u64)
    }

    async fn list_content(
        &self,
        site: SiteId,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<ContentItem>, IndexingError> {
        let offset = page.saturating_sub(1).saturating_mul(per_page);

        Ok(self
            .indexable_posts(site)
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .cloned()
            .map(ContentItem::from)
            .collect())
    }

    async fn list_terms(&self, site: SiteId) -> Result<Vec<ContentItem>, IndexingError> {
        Ok(self
            .snapshot
            .terms
            .iter()
            .filter(|term| term.site_id == site && is_indexable_taxonomy(&term.taxonomy))
            .cloned()
            .map(ContentItem::from)
            .collect())
    }
}

impl SchemaSource for SnapshotSource {
    fn post_kinds(&self) -> Vec<String> {
        if !self.snapshot.post_kinds.is_empty() {
            return self.snapshot.post_kinds.clone();
        }

        self.snapshot
            .posts
            .iter()
            .map(|post| post.post_type.clone())
            .chain(self.snapshot.taxonomies.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn taxonomy_kinds(&self) -> Vec<String> {
        self.snapshot
            .taxonomies
            .values()
            .flatten()
            .cloned()
            .chain(self.snapshot.terms.iter().map(|term| term.taxonomy.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn taxonomies_for(&self, post_kind: &str) -> Vec<String> {
        self.snapshot
            .taxonomies
            .get(post_kind)
            .cloned()
            .unwrap_or_default()
    }

    fn field_groups(&self, post_kind: &str) -> Option<Vec<CustomField>> {
        self.snapshot
            .field_groups
            .as_ref()
            .map(|groups| groups.get(post_kind).cloned().unwrap_or_default())
    }
}
