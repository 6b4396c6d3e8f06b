//! Per-call search options and collection scoping.

use serde::{Deserialize, Serialize};

/// Per-call options for a search.
///
/// Unset values fall back to the searcher's configuration: the current
/// locale and the configured threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Restrict to this locale (None = current locale)
    #[serde(default)]
    pub locale: Option<String>,
    /// Minimum full-text score for the scored tiers (None = configured default)
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Maximum results to return (None = unlimited)
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Which collections (streams) a search is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionScope {
    /// No collection restriction
    #[default]
    Any,
    /// Documents must belong to one of these streams
    Streams(Vec<String>),
}

impl CollectionScope {
    /// Scope to a single stream.
    pub fn stream(stream: impl Into<String>) -> Self {
        CollectionScope::Streams(vec![stream.into()])
    }

    /// Scope to several streams. An empty list means no restriction.
    pub fn streams<I, S>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let streams: Vec<String> = streams.into_iter().map(Into::into).collect();
        if streams.is_empty() {
            CollectionScope::Any
        } else {
            CollectionScope::Streams(streams)
        }
    }

    /// Check if a stream is inside this scope.
    pub fn contains(&self, stream: &str) -> bool {
        match self {
            CollectionScope::Any => true,
            CollectionScope::Streams(streams) => streams.iter().any(|s| s == stream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_builder() {
        let options = SearchOptions::new()
            .with_locale("de")
            .with_threshold(5.0)
            .with_limit(20);

        assert_eq!(options.locale.as_deref(), Some("de"));
        assert_eq!(options.threshold, Some(5.0));
        assert_eq!(options.limit, Some(20));
    }

    #[test]
    fn test_search_options_default() {
        let options = SearchOptions::default();
        assert!(options.locale.is_none());
        assert!(options.threshold.is_none());
        assert!(options.limit.is_none());
    }

    #[test]
    fn test_collection_scope() {
        assert!(CollectionScope::Any.contains("anything"));

        let scope = CollectionScope::stream("pages");
        assert!(scope.contains("pages"));
        assert!(!scope.contains("posts"));

        let scope = CollectionScope::streams(["pages", "posts"]);
        assert!(scope.contains("posts"));

        let empty: Vec<String> = Vec::new();
        assert_eq!(CollectionScope::streams(empty), CollectionScope::Any);
    }
}
