//! Schemas of the documents written for each content kind.
//!
//! Schemas are rebuilt on every call so that changes to the registered kinds
//! and custom fields take effect without a restart.

mod field;
mod post;
mod term;

pub use field::{suggest_name, FieldDefinition, Schema, SemanticType, SUGGEST_SUFFIX};
pub use post::{
    core_fields, custom_field_definition, is_indexable_post_kind, PostMappingBuilder,
    EXCLUDED_POST_KINDS, EXCLUDED_POST_TAXONOMIES, FIELD_CONTENT, FIELD_DATE, FIELD_LINK,
    FIELD_TITLE, FIELD_TYPE, RELATIONSHIP_SUFFIX, TAXONOMY_NAME_SUFFIX,
};
pub use term::{
    is_indexable_taxonomy, TermMappingBuilder, EXCLUDED_TERM_TAXONOMIES, FIELD_NAME, FIELD_SLUG,
};

/// Builds the schema of a content kind.
pub trait MappingBuilder: Send + Sync {
    /// Whether the kind is indexed at all.
    fn valid(&self, kind: &str) -> bool;

    /// The schema of the kind, or `None` for kinds that are not indexed.
    fn build(&self, kind: &str) -> Option<Schema>;
}
