//! Search documents and the builders producing them from content items.

mod factory;
mod post;
mod term;

use std::sync::Arc;

use content_index_shared::ContentItem;
use serde::Serialize;
use serde_json::{Map, Value};

pub use factory::DocumentBuilderFactory;
pub use post::PostDocumentBuilder;
pub use term::TermDocumentBuilder;

/// Field name to value, as written to the search engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The request body for the search engine.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// The public and private renditions of one item.
///
/// When the item's kind has no private fields both sides are the same
/// instance.
#[derive(Debug, Clone)]
pub struct DocumentPair {
    pub public: Arc<Document>,
    pub private: Arc<Document>,
}

impl DocumentPair {
    /// A pair sharing one document for both visibilities.
    pub fn shared(document: Document) -> Self {
        let document = Arc::new(document);
        Self {
            public: Arc::clone(&document),
            private: document,
        }
    }

    pub fn is_shared(&self) -> bool {
        Arc::ptr_eq(&self.public, &self.private)
    }
}

/// Converts content items of one family into documents.
pub trait DocumentBuilder: Send + Sync {
    /// Build the document of an item, or `None` when there is nothing to
    /// index. Private-only fields are omitted unless `include_private`.
    fn build(&self, item: &ContentItem, include_private: bool) -> Option<Document>;

    /// Identifier of the item within its kind.
    fn get_id(&self, item: &ContentItem) -> Option<String>;

    /// The item's content kind, used as the type name inside an index.
    fn get_kind(&self, item: &ContentItem) -> Option<String>;

    /// Whether the item may only be written to private indices.
    fn is_private(&self, item: &ContentItem) -> bool;

    /// Whether the schema of the item's kind declares private-only fields.
    fn has_private_fields(&self, item: &ContentItem) -> bool;

    /// Build both renditions of an item.
    fn build_pair(&self, item: &ContentItem) -> Option<DocumentPair> {
        let public = self.build(item, false)?;
        if !self.has_private_fields(item) {
            return Some(DocumentPair::shared(public));
        }

        let private = self.build(item, true)?;
        Some(DocumentPair {
            public: Arc::new(public),
            private: Arc::new(private),
        })
    }
}
