//! Searchable documents and field configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title column name.
pub const TITLE_FIELD: &str = "title";
/// Description column name.
pub const DESCRIPTION_FIELD: &str = "description";
/// Denormalized blob aggregating other source fields.
pub const SEARCHABLE_FIELD: &str = "searchable";

/// A searchable record owned by the content store.
///
/// The search core only reads documents; it never mutates them.
/// Text fields are flattened into the serialized form, so a corpus entry
/// looks like `{"id": "1", "locale": "en", "stream": "pages", "title": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Primary key
    pub id: String,
    /// Locale the entry is written in (e.g. "en", "de")
    pub locale: String,
    /// Stream (collection) the entry belongs to
    pub stream: String,
    /// Named text fields (title, description, searchable, ...)
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Document {
    /// Create a document with no text fields.
    pub fn new(id: impl Into<String>, locale: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locale: locale.into(),
            stream: stream.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a named text field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field(TITLE_FIELD, title)
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_field(DESCRIPTION_FIELD, description)
    }

    pub fn with_searchable(self, searchable: impl Into<String>) -> Self {
        self.with_field(SEARCHABLE_FIELD, searchable)
    }

    /// Get a text field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get any column by name, including the identity columns.
    pub fn column(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            "locale" => Some(self.locale.as_str()),
            "stream" => Some(self.stream.as_str()),
            _ => self.field(name),
        }
    }
}

/// Which columns each tier matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    /// Fields that should trump anything else (title, description)
    #[serde(default = "default_primary_fields")]
    pub primary: Vec<String>,

    /// Lower-priority blob fields (searchable)
    #[serde(default = "default_secondary_fields")]
    pub secondary: Vec<String>,
}

fn default_primary_fields() -> Vec<String> {
    vec![TITLE_FIELD.to_string(), DESCRIPTION_FIELD.to_string()]
}

fn default_secondary_fields() -> Vec<String> {
    vec![SEARCHABLE_FIELD.to_string()]
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            primary: default_primary_fields(),
            secondary: default_secondary_fields(),
        }
    }
}

impl FieldSet {
    pub fn new(primary: Vec<String>, secondary: Vec<String>) -> Self {
        Self { primary, secondary }
    }

    /// Fields the substring fallback checks: every primary field, then every
    /// secondary field, without duplicates.
    pub fn fallback_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::with_capacity(self.primary.len() + self.secondary.len());
        for field in self.primary.iter().chain(self.secondary.iter()) {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("42", "en", "pages")
            .with_title("Quick Start")
            .with_description("Getting going")
            .with_searchable("quick start guide");

        assert_eq!(doc.field(TITLE_FIELD), Some("Quick Start"));
        assert_eq!(doc.column("locale"), Some("en"));
        assert_eq!(doc.column("stream"), Some("pages"));
        assert_eq!(doc.column("id"), Some("42"));
        assert_eq!(doc.column("missing"), None);
    }

    #[test]
    fn test_document_flattened_json() {
        let json = r#"{"id":"7","locale":"de","stream":"posts","title":"Hallo","searchable":"welt"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id, "7");
        assert_eq!(doc.field("title"), Some("Hallo"));
        assert_eq!(doc.field("searchable"), Some("welt"));
        assert_eq!(doc.field("description"), None);

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["title"], "Hallo");
    }

    #[test]
    fn test_default_field_set() {
        let fields = FieldSet::default();
        assert_eq!(fields.primary, vec!["title", "description"]);
        assert_eq!(fields.secondary, vec!["searchable"]);
        assert_eq!(
            fields.fallback_fields(),
            vec!["title", "description", "searchable"]
        );
    }

    #[test]
    fn test_fallback_fields_dedup() {
        let fields = FieldSet::new(
            vec!["title".into(), "body".into()],
            vec!["body".into(), "tags".into()],
        );
        assert_eq!(fields.fallback_fields(), vec!["title", "body", "tags"]);
    }
}
