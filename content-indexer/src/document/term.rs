//! Document builder for taxonomy terms.

use std::collections::HashSet;

use content_index_shared::{ContentItem, Term};
use serde_json::{json, Map};

use super::{Document, DocumentBuilder};
use crate::config::IndexerConfig;
use crate::mapping::{suggest_name, MappingBuilder, TermMappingBuilder, FIELD_NAME, FIELD_SLUG};

/// Builds term documents: name, its suggest companion and slug.
pub struct TermDocumentBuilder {
    mappings: TermMappingBuilder,
    private_fields: HashSet<String>,
}

impl TermDocumentBuilder {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            mappings: TermMappingBuilder::new(),
            private_fields: config.private_fields.iter().cloned().collect(),
        }
    }

    fn build_term(&self, term: &Term, include_private: bool) -> Option<Document> {
        if !self.mappings.valid(&term.taxonomy) {
            return None;
        }

        let withheld = |name: &str| !include_private && self.private_fields.contains(name);
        let mut fields = Map::new();

        let suggest = suggest_name(FIELD_NAME);
        if !withheld(FIELD_NAME) {
            fields.insert(FIELD_NAME.to_string(), json!(term.name));
            if !withheld(suggest.as_str()) {
                fields.insert(suggest, json!(term.name));
            }
        }
        if !withheld(FIELD_SLUG) {
            fields.insert(FIELD_SLUG.to_string(), json!(term.slug));
        }

        Some(Document::from(fields))
    }
}

impl DocumentBuilder for TermDocumentBuilder {
    fn build(&self, item: &ContentItem, include_private: bool) -> Option<Document> {
        match item {
            ContentItem::Term(term) => self.build_term(term, include_private),
            _ => None,
        }
    }

    fn get_id(&self, item: &ContentItem) -> Option<String> {
        match item {
            ContentItem::Term(term) if !term.term_id.is_empty() => Some(term.term_id.clone()),
            _ => None,
        }
    }

    fn get_kind(&self, item: &ContentItem) -> Option<String> {
        match item {
            ContentItem::Term(term) => Some(term.taxonomy.clone()),
            _ => None,
        }
    }

    fn is_private(&self, _item: &ContentItem) -> bool {
        false
    }

    fn has_private_fields(&self, item: &ContentItem) -> bool {
        self.mappings
            .build(item.kind())
            .map(|schema| schema.fields().any(|(name, _)| self.private_fields.contains(name)))
            .unwrap_or(false)
    }
}
