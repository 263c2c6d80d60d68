//! Custom field definitions registered for a content kind.
//!
//! Field types arrive as string tags from the custom-field system and are
//! parsed into a closed enumeration. Tags this crate does not know about are
//! kept in [`CustomFieldType::Other`].

use serde::{Deserialize, Serialize};

/// A custom field registered for a content kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    /// Sub-fields of a repeating group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<CustomField>,
}

impl CustomField {
    pub fn new(name: impl Into<String>, field_type: impl Into<CustomFieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            sub_fields: Vec::new(),
        }
    }

    /// Create a repeating group with the given sub-fields.
    pub fn repeater(name: impl Into<String>, sub_fields: Vec<CustomField>) -> Self {
        Self {
            name: name.into(),
            field_type: CustomFieldType::Repeater,
            sub_fields,
        }
    }
}

/// Type tag of a custom field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomFieldType {
    Text,
    Textarea,
    Wysiwyg,
    Email,
    Url,
    ColorPicker,
    PageLink,
    Radio,
    Select,
    Checkbox,
    TrueFalse,
    DatePicker,
    DateTimePicker,
    TimePicker,
    Number,
    GoogleMap,
    Image,
    File,
    Oembed,
    Message,
    Password,
    PostObject,
    Relationship,
    Repeater,
    Taxonomy,
    User,
    Tab,
    Other(String),
}

impl CustomFieldType {
    /// The type tag as used by the custom-field system.
    pub fn as_str(&self) -> &str {
        match self {
            CustomFieldType::Text => "text",
            CustomFieldType::Textarea => "textarea",
            CustomFieldType::Wysiwyg => "wysiwyg",
            CustomFieldType::Email => "email",
            CustomFieldType::Url => "url",
            CustomFieldType::ColorPicker => "color_picker",
            CustomFieldType::PageLink => "page_link",
            CustomFieldType::Radio => "radio",
            CustomFieldType::Select => "select",
            CustomFieldType::Checkbox => "checkbox",
            CustomFieldType::TrueFalse => "true_false",
            CustomFieldType::DatePicker => "date_picker",
            CustomFieldType::DateTimePicker => "date_time_picker",
            CustomFieldType::TimePicker => "time_picker",
            CustomFieldType::Number => "number",
            CustomFieldType::GoogleMap => "google_map",
            CustomFieldType::Image => "image",
            CustomFieldType::File => "file",
            CustomFieldType::Oembed => "oembed",
            CustomFieldType::Message => "message",
            CustomFieldType::Password => "password",
            CustomFieldType::PostObject => "post_object",
            CustomFieldType::Relationship => "relationship",
            CustomFieldType::Repeater => "repeater",
            CustomFieldType::Taxonomy => "taxonomy",
            CustomFieldType::User => "user",
            CustomFieldType::Tab => "tab",
            CustomFieldType::Other(tag) => tag,
        }
    }
}

impl From<&str> for CustomFieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => CustomFieldType::Text,
            "textarea" => CustomFieldType::Textarea,
            "wysiwyg" => CustomFieldType::Wysiwyg,
            "email" => CustomFieldType::Email,
            "url" => CustomFieldType::Url,
            "color_picker" => CustomFieldType::ColorPicker,
            "page_link" => CustomFieldType::PageLink,
            "radio" => CustomFieldType::Radio,
            "select" => CustomFieldType::Select,
            "checkbox" => CustomFieldType::Checkbox,
            "true_false" => CustomFieldType::TrueFalse,
            "date_picker" => CustomFieldType::DatePicker,
            "date_time_picker" => CustomFieldType::DateTimePicker,
            "time_picker" => CustomFieldType::TimePicker,
            "number" => CustomFieldType::Number,
            "google_map" => CustomFieldType::GoogleMap,
            "image" => CustomFieldType::Image,
            "file" => CustomFieldType::File,
            "oembed" => CustomFieldType::Oembed,
            "message" => CustomFieldType::Message,
            "password" => CustomFieldType::Password,
            "post_object" => CustomFieldType::PostObject,
            "relationship" => CustomFieldType::Relationship,
            "repeater" => CustomFieldType::Repeater,
            "taxonomy" => CustomFieldType::Taxonomy,
            "user" => CustomFieldType::User,
            "tab" => CustomFieldType::Tab,
            other => CustomFieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for CustomFieldType {
    fn from(tag: String) -> Self {
        CustomFieldType::from(tag.as_str())
    }
}

impl From<CustomFieldType> for String {
    fn from(field_type: CustomFieldType) -> Self {
        field_type.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_and_unknown_tags() {
        assert_eq!(CustomFieldType::from("repeater"), CustomFieldType::Repeater);
        assert_eq!(
            CustomFieldType::from("date_time_picker"),
            CustomFieldType::DateTimePicker
        );
        assert_eq!(
            CustomFieldType::from("range"),
            CustomFieldType::Other("range".to_string())
        );
        assert_eq!(CustomFieldType::from("range").as_str(), "range");
    }

    #[test]
    fn test_deserialize_nested_definition() {
        let field: CustomField = serde_json::from_value(json!({
            "name": "gallery",
            "type": "repeater",
            "sub_fields": [{ "name": "caption", "type": "text" }]
        }))
        .unwrap();

        assert_eq!(field.field_type, CustomFieldType::Repeater);
        assert_eq!(field.sub_fields.len(), 1);
        assert_eq!(field.sub_fields[0].field_type, CustomFieldType::Text);
        assert!(field.sub_fields[0].sub_fields.is_empty());
    }

    #[test]
    fn test_serialize_uses_tag() {
        let value = serde_json::to_value(CustomField::new("size", "number")).unwrap();
        assert_eq!(value, json!({ "name": "size", "type": "number" }));
    }
}
