//! Mapping builder for post-like content.

use std::sync::Arc;

use content_index_shared::{CustomField, CustomFieldType};

use super::field::{suggest_name, FieldDefinition, Schema};
use super::MappingBuilder;
use crate::sources::SchemaSource;
use crate::transformer::{FieldTransformer, TIME_FORMAT};

/// Post kinds that are never indexed.
pub const EXCLUDED_POST_KINDS: [&str; 9] = [
    "revision",
    "attachment",
    "json_consumer",
    "nav_menu",
    "nav_menu_item",
    "post_format",
    "link_category",
    "acf-field-group",
    "acf-field",
];

/// Taxonomies that are never denormalized into post documents.
pub const EXCLUDED_POST_TAXONOMIES: [&str; 2] = ["post_tag", "post_format"];

pub const FIELD_CONTENT: &str = "post_content";
pub const FIELD_TITLE: &str = "post_title";
pub const FIELD_TYPE: &str = "post_type";
pub const FIELD_DATE: &str = "post_date";
pub const FIELD_LINK: &str = "link";

/// Suffix appended to relationship field names.
pub const RELATIONSHIP_SUFFIX: &str = "_relationship";

/// Suffix of the free-text companion of a taxonomy field.
pub const TAXONOMY_NAME_SUFFIX: &str = "_name";

/// Whether a post kind may be indexed at all.
pub fn is_indexable_post_kind(kind: &str) -> bool {
    !kind.is_empty() && !EXCLUDED_POST_KINDS.contains(&kind)
}

/// Fields every post document carries.
pub fn core_fields() -> [(&'static str, FieldDefinition); 5] {
    [
        (
            FIELD_CONTENT,
            FieldDefinition::text()
                .with_suggest()
                .with_transformer(FieldTransformer::Html),
        ),
        (FIELD_TITLE, FieldDefinition::text().with_suggest()),
        (FIELD_TYPE, FieldDefinition::exact()),
        (
            FIELD_DATE,
            FieldDefinition::date().with_transformer(FieldTransformer::Date),
        ),
        (FIELD_LINK, FieldDefinition::exact()),
    ]
}

/// Derive the document field name and definition of a custom field.
///
/// Returns `None` for field types that are never indexed and for fields
/// without a name.
pub fn custom_field_definition(field: &CustomField) -> Option<(String, FieldDefinition)> {
    if field.name.is_empty() {
        return None;
    }

    let definition = match &field.field_type {
        CustomFieldType::Tab
        | CustomFieldType::Password
        | CustomFieldType::Message
        | CustomFieldType::File
        | CustomFieldType::Oembed => return None,
        CustomFieldType::Checkbox | CustomFieldType::TrueFalse => FieldDefinition::boolean(),
        CustomFieldType::DatePicker | CustomFieldType::DateTimePicker => {
            FieldDefinition::date().with_transformer(FieldTransformer::Date)
        }
        CustomFieldType::TimePicker => FieldDefinition::date().with_format(TIME_FORMAT),
        CustomFieldType::Number => FieldDefinition::long(),
        CustomFieldType::GoogleMap => {
            FieldDefinition::geo_point().with_transformer(FieldTransformer::GeoPoint)
        }
        CustomFieldType::Relationship => {
            return Some((
                format!("{}{}", field.name, RELATIONSHIP_SUFFIX),
                FieldDefinition::long(),
            ))
        }
        CustomFieldType::Repeater => FieldDefinition::nested(nested_schema(&field.sub_fields)),
        CustomFieldType::Wysiwyg => {
            FieldDefinition::text().with_transformer(FieldTransformer::Html)
        }
        CustomFieldType::Text
        | CustomFieldType::Textarea
        | CustomFieldType::Email
        | CustomFieldType::Url
        | CustomFieldType::ColorPicker
        | CustomFieldType::PageLink
        | CustomFieldType::Radio
        | CustomFieldType::Select
        | CustomFieldType::Image
        | CustomFieldType::PostObject
        | CustomFieldType::Taxonomy
        | CustomFieldType::User
        | CustomFieldType::Other(_) => FieldDefinition::text(),
    };

    Some((field.name.clone(), definition))
}

fn nested_schema(sub_fields: &[CustomField]) -> Schema {
    let mut schema = Schema::new();
    for field in sub_fields {
        if let Some((name, definition)) = custom_field_definition(field) {
            schema.insert(name, definition);
        }
    }
    schema
}

/// Builds the schema of a post kind from its core fields, its custom fields
/// and its taxonomies.
#[derive(Clone)]
pub struct PostMappingBuilder {
    schema_source: Arc<dyn SchemaSource>,
}

impl PostMappingBuilder {
    pub fn new(schema_source: Arc<dyn SchemaSource>) -> Self {
        Self { schema_source }
    }

    /// Taxonomies of a post kind that are denormalized into its documents.
    pub fn taxonomies(&self, kind: &str) -> Vec<String> {
        self.schema_source
            .taxonomies_for(kind)
            .into_iter()
            .filter(|taxonomy| !EXCLUDED_POST_TAXONOMIES.contains(&taxonomy.as_str()))
            .collect()
    }

    /// Custom fields of a post kind. Empty when the host has none.
    pub fn custom_fields(&self, kind: &str) -> Vec<CustomField> {
        self.schema_source.field_groups(kind).unwrap_or_default()
    }
}

impl MappingBuilder for PostMappingBuilder {
    fn valid(&self, kind: &str) -> bool {
        is_indexable_post_kind(kind)
    }

    fn build(&self, kind: &str) -> Option<Schema> {
        if !self.valid(kind) {
            return None;
        }

        let mut schema = Schema::new();

        for (name, definition) in core_fields() {
            schema.insert(name, definition);
        }

        for field in self.custom_fields(kind) {
            if let Some((name, definition)) = custom_field_definition(&field) {
                schema.insert(name, definition);
            }
        }

        for taxonomy in self.taxonomies(kind) {
            schema.insert(
                format!("{}{}", taxonomy, TAXONOMY_NAME_SUFFIX),
                FieldDefinition::text(),
            );
            schema.insert(suggest_name(&taxonomy), FieldDefinition::suggest());
            schema.insert(taxonomy, FieldDefinition::exact());
        }

        Some(schema)
    }
}
