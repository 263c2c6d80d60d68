//! Dispatch of content items to their document builder.

use std::sync::Arc;

use content_index_shared::ContentItem;

use super::{DocumentBuilder, PostDocumentBuilder, TermDocumentBuilder};
use crate::config::IndexerConfig;
use crate::errors::IndexingError;
use crate::sources::SchemaSource;

/// Selects the document builder for an item's variant.
pub struct DocumentBuilderFactory {
    posts: PostDocumentBuilder,
    terms: TermDocumentBuilder,
}

impl DocumentBuilderFactory {
    pub fn new(schema_source: Arc<dyn SchemaSource>, config: &IndexerConfig) -> Self {
        Self {
            posts: PostDocumentBuilder::new(schema_source, config),
            terms: TermDocumentBuilder::new(config),
        }
    }

    /// The builder for an item.
    ///
    /// # Returns
    ///
    /// * `Ok(&dyn DocumentBuilder)` - The builder of the item's variant
    /// * `Err(IndexingError::UnsupportedContentKind)` - If no builder handles
    ///   the variant
    pub fn create(&self, item: &ContentItem) -> Result<&dyn DocumentBuilder, IndexingError> {
        match item {
            ContentItem::Post(_) => Ok(&self.posts),
            ContentItem::Term(_) => Ok(&self.terms),
            ContentItem::Site(site) => Err(IndexingError::unsupported(format!(
                "site {} has no document builder",
                site.site_id
            ))),
        }
    }
}
