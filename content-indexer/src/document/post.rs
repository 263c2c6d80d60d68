//! Document builder for post-like content.

use std::collections::HashSet;
use std::sync::Arc;

use content_index_shared::{ContentItem, CustomField, CustomFieldType, Post, STATUS_PRIVATE};
use serde_json::{json, Map, Value};

use super::{Document, DocumentBuilder};
use crate::config::IndexerConfig;
use crate::mapping::{
    core_fields, custom_field_definition, suggest_name, FieldDefinition, MappingBuilder,
    PostMappingBuilder, FIELD_CONTENT, FIELD_DATE, FIELD_LINK, FIELD_TITLE, FIELD_TYPE,
    TAXONOMY_NAME_SUFFIX,
};
use crate::sources::SchemaSource;

/// Builds post documents following the schema of [`PostMappingBuilder`].
pub struct PostDocumentBuilder {
    mappings: PostMappingBuilder,
    private_fields: HashSet<String>,
    private_kinds: HashSet<String>,
}

impl PostDocumentBuilder {
    pub fn new(schema_source: Arc<dyn SchemaSource>, config: &IndexerConfig) -> Self {
        Self {
            mappings: PostMappingBuilder::new(schema_source),
            private_fields: config.private_fields.iter().cloned().collect(),
            private_kinds: config.private_post_kinds.iter().cloned().collect(),
        }
    }

    fn build_post(&self, post: &Post, include_private: bool) -> Option<Document> {
        let kind = post.post_type.as_str();
        if !self.mappings.valid(kind) {
            return None;
        }

        let withheld = |name: &str| !include_private && self.private_fields.contains(name);
        let mut fields = Map::new();

        for (name, definition) in core_fields() {
            if withheld(name) {
                continue;
            }
            if let Some(raw) = core_value(post, name) {
                insert_field(&mut fields, name, &definition, prepare(&definition, &raw));
            }
        }

        for field in self.mappings.custom_fields(kind) {
            let Some((name, definition)) = custom_field_definition(&field) else {
                continue;
            };
            if withheld(&name) {
                continue;
            }
            let Some(raw) = post.custom_fields.get(&field.name) else {
                continue;
            };
            if let Some(value) = field_value(&field, &definition, raw) {
                insert_field(&mut fields, &name, &definition, value);
            }
        }

        for taxonomy in self.mappings.taxonomies(kind) {
            if withheld(&taxonomy) {
                continue;
            }
            let Some(terms) = post.terms.get(&taxonomy).filter(|terms| !terms.is_empty()) else {
                continue;
            };
            let slugs: Vec<&str> = terms.iter().map(|term| term.slug.as_str()).collect();
            let names: Vec<&str> = terms.iter().map(|term| term.name.as_str()).collect();

            fields.insert(
                format!("{}{}", taxonomy, TAXONOMY_NAME_SUFFIX),
                json!(names),
            );
            fields.insert(suggest_name(&taxonomy), json!(names));
            fields.insert(taxonomy, json!(slugs));
        }

        // Derived keys (`_suggest`, `<tax>_name`) may be listed on their own
        if !include_private {
            fields.retain(|key, _| !self.private_fields.contains(key));
        }

        Some(Document::from(fields))
    }
}

impl DocumentBuilder for PostDocumentBuilder {
    fn build(&self, item: &ContentItem, include_private: bool) -> Option<Document> {
        match item {
            ContentItem::Post(post) => self.build_post(post, include_private),
            _ => None,
        }
    }

    fn get_id(&self, item: &ContentItem) -> Option<String> {
        match item {
            ContentItem::Post(post) if !post.id.is_empty() => Some(post.id.clone()),
            _ => None,
        }
    }

    fn get_kind(&self, item: &ContentItem) -> Option<String> {
        match item {
            ContentItem::Post(post) => Some(post.post_type.clone()),
            _ => None,
        }
    }

    fn is_private(&self, item: &ContentItem) -> bool {
        match item {
            ContentItem::Post(post) => {
                post.status == STATUS_PRIVATE || self.private_kinds.contains(&post.post_type)
            }
            _ => false,
        }
    }

    fn has_private_fields(&self, item: &ContentItem) -> bool {
        if self.private_fields.is_empty() {
            return false;
        }
        self.mappings
            .build(item.kind())
            .map(|schema| schema.fields().any(|(name, _)| self.private_fields.contains(name)))
            .unwrap_or(false)
    }
}

fn core_value(post: &Post, name: &str) -> Option<Value> {
    match name {
        FIELD_CONTENT => Some(json!(post.content)),
        FIELD_TITLE => Some(json!(post.title)),
        FIELD_TYPE => Some(json!(post.post_type)),
        FIELD_DATE => post.date.as_ref().map(|date| json!(date)),
        FIELD_LINK => post.link.as_ref().map(|link| json!(link)),
        _ => None,
    }
}

fn prepare(definition: &FieldDefinition, raw: &Value) -> Value {
    match definition.transformer {
        Some(transformer) => transformer.transform(raw),
        None => raw.clone(),
    }
}

/// The document value of a custom field, or `None` when it holds nothing.
fn field_value(field: &CustomField, definition: &FieldDefinition, raw: &Value) -> Option<Value> {
    if raw.is_null() {
        return None;
    }
    match field.field_type {
        CustomFieldType::Repeater => nested_rows(&field.sub_fields, raw),
        _ => Some(prepare(definition, raw)),
    }
}

/// Copy every row of a repeating group, field by field.
fn nested_rows(sub_fields: &[CustomField], raw: &Value) -> Option<Value> {
    let rows: Vec<&Map<String, Value>> = match raw {
        Value::Array(rows) => rows.iter().filter_map(Value::as_object).collect(),
        Value::Object(row) => vec![row],
        // Empty groups are stored as `false` or an empty string
        _ => return None,
    };

    let rows = rows
        .into_iter()
        .map(|row| {
            let mut fields = Map::new();
            for field in sub_fields {
                let Some((name, definition)) = custom_field_definition(field) else {
                    continue;
                };
                let Some(raw) = row.get(&field.name) else {
                    continue;
                };
                if let Some(value) = field_value(field, &definition, raw) {
                    insert_field(&mut fields, &name, &definition, value);
                }
            }
            Value::Object(fields)
        })
        .collect();

    Some(Value::Array(rows))
}

fn insert_field(
    fields: &mut Map<String, Value>,
    name: &str,
    definition: &FieldDefinition,
    value: Value,
) {
    if definition.has_suggest_variant {
        fields.insert(suggest_name(name), value.clone());
    }
    fields.insert(name.to_string(), value);
}
