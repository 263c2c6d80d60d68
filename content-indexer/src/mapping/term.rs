//! Mapping builder for taxonomy terms.

use super::field::{FieldDefinition, Schema};
use super::MappingBuilder;

/// Taxonomies whose terms are never indexed.
pub const EXCLUDED_TERM_TAXONOMIES: [&str; 3] = ["nav_menu", "post_format", "link_category"];

pub const FIELD_NAME: &str = "name";
pub const FIELD_SLUG: &str = "slug";

/// Whether terms of a taxonomy may be indexed at all.
pub fn is_indexable_taxonomy(taxonomy: &str) -> bool {
    !taxonomy.is_empty() && !EXCLUDED_TERM_TAXONOMIES.contains(&taxonomy)
}

/// Builds the schema shared by every indexable taxonomy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermMappingBuilder;

impl TermMappingBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl MappingBuilder for TermMappingBuilder {
    fn valid(&self, kind: &str) -> bool {
        is_indexable_taxonomy(kind)
    }

    fn build(&self, kind: &str) -> Option<Schema> {
        if !self.valid(kind) {
            return None;
        }

        let mut schema = Schema::new();
        schema.insert(FIELD_NAME, FieldDefinition::text().with_suggest());
        schema.insert(FIELD_SLUG, FieldDefinition::exact());
        Some(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_schema() {
        let schema = TermMappingBuilder::new().build("category").unwrap();

        assert_eq!(schema.len(), 3);
        assert!(schema.get("name").unwrap().indexed);
        assert!(schema.get("name_suggest").unwrap().suggest);
        assert!(!schema.get("slug").unwrap().indexed);
    }

    #[test]
    fn test_excluded_taxonomies() {
        let builder = TermMappingBuilder::new();
        for taxonomy in EXCLUDED_TERM_TAXONOMIES {
            assert!(builder.build(taxonomy).is_none());
        }
        assert!(builder.valid("post_tag"));
    }
}
