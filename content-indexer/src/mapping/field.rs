//! Field definitions and schemas.

use std::collections::BTreeMap;

use content_index_repository::opensearch::{NGRAM_ANALYZER, WHITESPACE_ANALYZER};
use serde_json::{json, Map, Value};

use crate::transformer::FieldTransformer;

/// Suffix of the n-gram companion of a field.
pub const SUGGEST_SUFFIX: &str = "_suggest";

/// The name of the n-gram companion of `name`.
pub fn suggest_name(name: &str) -> String {
    format!("{}{}", name, SUGGEST_SUFFIX)
}

/// Value type of a field as the search engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    String,
    Date,
    Boolean,
    Long,
    GeoPoint,
    Nested,
}

/// How a single document field is mapped and prepared.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub semantic_type: SemanticType,
    /// Analyzed as free text. Not-indexed strings are matched exactly.
    pub indexed: bool,
    /// A `<name>_suggest` n-gram companion accompanies this field.
    pub has_suggest_variant: bool,
    /// This field is itself an n-gram suggest field.
    pub suggest: bool,
    pub transformer: Option<FieldTransformer>,
    pub format: Option<String>,
    pub nested_properties: Option<Schema>,
}

impl FieldDefinition {
    fn of(semantic_type: SemanticType) -> Self {
        Self {
            semantic_type,
            indexed: false,
            has_suggest_variant: false,
            suggest: false,
            transformer: None,
            format: None,
            nested_properties: None,
        }
    }

    /// Analyzed free text.
    pub fn text() -> Self {
        Self {
            indexed: true,
            ..Self::of(SemanticType::String)
        }
    }

    /// A string matched as a whole.
    pub fn exact() -> Self {
        Self::of(SemanticType::String)
    }

    /// An n-gram suggest field.
    pub fn suggest() -> Self {
        Self {
            indexed: true,
            suggest: true,
            ..Self::of(SemanticType::String)
        }
    }

    pub fn date() -> Self {
        Self::of(SemanticType::Date)
    }

    pub fn boolean() -> Self {
        Self::of(SemanticType::Boolean)
    }

    pub fn long() -> Self {
        Self::of(SemanticType::Long)
    }

    pub fn geo_point() -> Self {
        Self::of(SemanticType::GeoPoint)
    }

    /// An array of sub-documents. Nested fields are never analyzed themselves.
    pub fn nested(properties: Schema) -> Self {
        Self {
            nested_properties: Some(properties),
            ..Self::of(SemanticType::Nested)
        }
    }

    pub fn with_suggest(mut self) -> Self {
        self.has_suggest_variant = self.semantic_type != SemanticType::Nested;
        self
    }

    pub fn with_transformer(mut self, transformer: FieldTransformer) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Render as an OpenSearch property mapping.
    pub fn to_mapping(&self) -> Value {
        let mut mapping = match self.semantic_type {
            SemanticType::String if self.suggest => json!({
                "type": "text",
                "analyzer": NGRAM_ANALYZER,
                "search_analyzer": WHITESPACE_ANALYZER,
            }),
            SemanticType::String if self.indexed => json!({ "type": "text" }),
            SemanticType::String => json!({ "type": "keyword" }),
            SemanticType::Date => json!({ "type": "date" }),
            SemanticType::Boolean => json!({ "type": "boolean" }),
            SemanticType::Long => json!({ "type": "long" }),
            SemanticType::GeoPoint => json!({ "type": "geo_point" }),
            SemanticType::Nested => json!({
                "type": "nested",
                "properties": self
                    .nested_properties
                    .as_ref()
                    .map(Schema::to_mapping)
                    .unwrap_or_else(|| Value::Object(Map::new())),
            }),
        };

        if let (Some(format), Value::Object(map)) = (&self.format, &mut mapping) {
            map.insert("format".to_string(), json!(format));
        }
        mapping
    }
}

/// Field name to field definition. Later inserts overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: BTreeMap<String, FieldDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, adding its `_suggest` companion when it has one.
    pub fn insert(&mut self, name: impl Into<String>, definition: FieldDefinition) {
        let name = name.into();
        if definition.has_suggest_variant {
            self.fields
                .insert(suggest_name(&name), FieldDefinition::suggest());
        }
        self.fields.insert(name, definition);
    }

    /// Insert every field of `other`, overwriting on collision.
    pub fn merge(&mut self, other: Schema) {
        self.fields.extend(other.fields);
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldDefinition)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as the `properties` object of an OpenSearch mapping.
    pub fn to_mapping(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, definition)| (name.clone(), definition.to_mapping()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_adds_suggest_companion() {
        let mut schema = Schema::new();
        schema.insert("post_title", FieldDefinition::text().with_suggest());

        assert_eq!(schema.len(), 2);
        let companion = schema.get("post_title_suggest").unwrap();
        assert!(companion.suggest);
        assert!(!companion.has_suggest_variant);
    }

    #[test]
    fn test_nested_never_has_suggest() {
        let definition = FieldDefinition::nested(Schema::new()).with_suggest();
        assert!(!definition.has_suggest_variant);
        assert!(!definition.indexed);
    }

    #[test]
    fn test_later_insert_wins() {
        let mut schema = Schema::new();
        schema.insert("price", FieldDefinition::text());
        schema.insert("price", FieldDefinition::long());
        assert_eq!(schema.get("price").unwrap().semantic_type, SemanticType::Long);
    }

    #[test]
    fn test_mapping_rendering() {
        let mut gallery = Schema::new();
        gallery.insert("caption", FieldDefinition::text());

        let mut schema = Schema::new();
        schema.insert("post_type", FieldDefinition::exact());
        schema.insert("opening", FieldDefinition::date().with_format("HH:mm:ss"));
        schema.insert("gallery", FieldDefinition::nested(gallery));
        schema.insert("post_title", FieldDefinition::text().with_suggest());

        let mapping = schema.to_mapping();
        assert_eq!(mapping["post_type"], json!({ "type": "keyword" }));
        assert_eq!(
            mapping["opening"],
            json!({ "type": "date", "format": "HH:mm:ss" })
        );
        assert_eq!(mapping["gallery"]["type"], "nested");
        assert_eq!(mapping["gallery"]["properties"]["caption"]["type"], "text");
        assert_eq!(
            mapping["post_title_suggest"],
            json!({
                "type": "text",
                "analyzer": "ngram_analyzer",
                "search_analyzer": "whitespace_analyzer"
            })
        );
    }
}
