//! Collaborators that describe and list the host's content.

mod snapshot;

use async_trait::async_trait;
use content_index_shared::{ContentItem, CustomField, Site, SiteId};

use crate::errors::IndexingError;

pub use snapshot::{ContentSnapshot, SnapshotSource};

/// Lists the content of the host system.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every site of a multi-tenant deployment.
    async fn list_sites(&self) -> Result<Vec<Site>, IndexingError>;

    /// Number of indexable items of a site, consistent with [`list_content`].
    ///
    /// [`list_content`]: ContentSource::list_content
    async fn count_content(&self, site: SiteId) -> Result<u64, IndexingError>;

    /// One page of indexable items of a site. Pages start at 1.
    async fn list_content(
        &self,
        site: SiteId,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<ContentItem>, IndexingError>;

    /// Every taxonomy term of a site.
    async fn list_terms(&self, site: SiteId) -> Result<Vec<ContentItem>, IndexingError>;
}

/// Describes the content kinds registered in the host system.
pub trait SchemaSource: Send + Sync {
    /// Every registered post kind.
    fn post_kinds(&self) -> Vec<String>;

    /// Every registered taxonomy.
    fn taxonomy_kinds(&self) -> Vec<String>;

    /// Taxonomies attached to a post kind.
    fn taxonomies_for(&self, post_kind: &str) -> Vec<String>;

    /// Custom fields attached to a post kind, in declaration order.
    ///
    /// `None` when the host has no custom-field system.
    fn field_groups(&self, post_kind: &str) -> Option<Vec<CustomField>>;
}
