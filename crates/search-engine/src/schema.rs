//! Schema and locale collaborators.
//!
//! The searcher never hard-codes column names or the active locale; both
//! come from providers injected at construction.

use search_types::{FieldSet, Settings};

/// Supplies the searchable columns and the scoping column names.
pub trait SchemaProvider: Send + Sync {
    /// Fields for the primary and secondary tiers.
    fn search_fields(&self) -> FieldSet;

    /// Column holding the document locale.
    fn locale_field(&self) -> String;

    /// Column holding the document's collection (stream).
    fn collection_field(&self) -> String;
}

/// Supplies the locale used when a search does not name one.
pub trait LocaleProvider: Send + Sync {
    fn current_locale(&self) -> String;
}

/// Schema fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSchema {
    fields: FieldSet,
    locale_field: String,
    collection_field: String,
}

impl Default for StaticSchema {
    fn default() -> Self {
        Self {
            fields: FieldSet::default(),
            locale_field: "locale".to_string(),
            collection_field: "stream".to_string(),
        }
    }
}

impl StaticSchema {
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn with_locale_field(mut self, field: impl Into<String>) -> Self {
        self.locale_field = field.into();
        self
    }

    pub fn with_collection_field(mut self, field: impl Into<String>) -> Self {
        self.collection_field = field.into();
        self
    }

    /// Schema from the configured field set and column names.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.fields.clone())
            .with_locale_field(settings.locale_column.clone())
            .with_collection_field(settings.collection_column.clone())
    }
}

impl SchemaProvider for StaticSchema {
    fn search_fields(&self) -> FieldSet {
        self.fields.clone()
    }

    fn locale_field(&self) -> String {
        self.locale_field.clone()
    }

    fn collection_field(&self) -> String {
        self.collection_field.clone()
    }
}

/// Locale that never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocale(String);

impl FixedLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self(locale.into())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_locale.clone())
    }
}

impl LocaleProvider for FixedLocale {
    fn current_locale(&self) -> String {
        self.0.clone()
    }
}
