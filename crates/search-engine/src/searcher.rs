//! Tiered search over an injected store.
//!
//! Compiles the phrase, scopes it to a locale and collection, and hands the
//! expression to the [`StoreClient`]. Ranking is entirely the store's job.

use std::sync::Arc;

use search_query::{Predicate, QueryCompiler, QueryExpression, DEFAULT_THRESHOLD};
use search_types::{
    check_threshold, CollectionScope, RankedResult, SearchError, SearchOptions, Settings,
};
use tracing::{info, warn};

use crate::schema::{LocaleProvider, SchemaProvider};
use crate::store::StoreClient;

/// Compile a phrase and scope it to a locale and collection.
///
/// The locale restriction is applied first, then the collection scope.
/// Neither touches score columns or ordering keys. The threshold is
/// checked before the phrase.
pub fn scoped_expression<P>(
    schema: &P,
    phrase: &str,
    locale: &str,
    scope: &CollectionScope,
    threshold: f64,
) -> Result<QueryExpression, SearchError>
where
    P: SchemaProvider + ?Sized,
{
    check_threshold(threshold)?;
    let compiler = QueryCompiler::new(schema.search_fields()).with_threshold(threshold);
    let mut expr = compiler
        .compile(phrase)?
        .restrict(Predicate::field_equals(schema.locale_field(), locale));

    if let CollectionScope::Streams(streams) = scope {
        expr = expr.restrict(Predicate::FieldIn {
            field: schema.collection_field(),
            values: streams.clone(),
        });
    }

    Ok(expr)
}

/// Searcher combining a store, a schema and a locale source.
pub struct TieredSearcher<S, P, L>
where
    S: StoreClient,
    P: SchemaProvider,
    L: LocaleProvider,
{
    store: Arc<S>,
    schema: Arc<P>,
    locale: Arc<L>,
    threshold: f64,
}

impl<S, P, L> TieredSearcher<S, P, L>
where
    S: StoreClient,
    P: SchemaProvider,
    L: LocaleProvider,
{
    /// Create a searcher with the default threshold.
    pub fn new(store: Arc<S>, schema: Arc<P>, locale: Arc<L>) -> Self {
        Self {
            store,
            schema,
            locale,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Threshold used when a search does not set one.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Apply configured defaults.
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_threshold(settings.threshold)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compile and scope a phrase without executing it.
    pub fn build_expression(
        &self,
        phrase: &str,
        scope: &CollectionScope,
        options: &SearchOptions,
    ) -> Result<QueryExpression, SearchError> {
        self.scoped(phrase, scope, options).map(|(expr, _)| expr)
    }

    /// Scoped expression plus the locale it was restricted to.
    fn scoped(
        &self,
        phrase: &str,
        scope: &CollectionScope,
        options: &SearchOptions,
    ) -> Result<(QueryExpression, String), SearchError> {
        let locale = options
            .locale
            .clone()
            .unwrap_or_else(|| self.locale.current_locale());
        let threshold = options.threshold.unwrap_or(self.threshold);
        let expr = scoped_expression(self.schema.as_ref(), phrase, &locale, scope, threshold)?;
        Ok((expr, locale))
    }

    /// Run a tiered search.
    ///
    /// A phrase with no searchable terms returns no results without
    /// querying the store. Store and schema errors propagate unchanged.
    pub fn search(
        &self,
        phrase: &str,
        scope: &CollectionScope,
        options: &SearchOptions,
    ) -> Result<Vec<RankedResult>, SearchError> {
        let (expr, locale) = match self.scoped(phrase, scope, options) {
            Ok(scoped) => scoped,
            Err(e) if e.is_invalid_phrase() => {
                warn!(phrase, "Phrase has no searchable terms, returning no results");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let results = self.store.execute(&expr, options.limit)?;

        info!(
            phrase,
            locale = %locale,
            tiers = expr.columns.len(),
            results = results.len(),
            "Tiered search complete"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::schema::{FixedLocale, StaticSchema};
    use crate::store::MockStore;
    use search_types::{Document, FieldSet};

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("en-page", "en", "pages").with_title("The Quick Brown Fox"),
            Document::new("en-post", "en", "posts").with_title("Quick fox sightings"),
            Document::new("de-page", "de", "pages").with_title("Quick fox auf Deutsch"),
        ]
    }

    fn searcher() -> TieredSearcher<MemoryStore, StaticSchema, FixedLocale> {
        TieredSearcher::new(
            Arc::new(MemoryStore::new().with_documents(corpus()).unwrap()),
            Arc::new(StaticSchema::default()),
            Arc::new(FixedLocale::new("en")),
        )
    }

    fn ids(results: &[RankedResult]) -> Vec<&str> {
        results.iter().map(|r| r.document_id.as_str()).collect()
    }

    #[test]
    fn test_search_current_locale() {
        let results = searcher()
            .search("quick fox", &CollectionScope::Any, &SearchOptions::new())
            .unwrap();
        assert_eq!(ids(&results), vec!["en-page", "en-post"]);
    }

    #[test]
    fn test_search_explicit_locale() {
        let results = searcher()
            .search(
                "quick fox",
                &CollectionScope::Any,
                &SearchOptions::new().with_locale("de"),
            )
            .unwrap();
        assert_eq!(ids(&results), vec!["de-page"]);
    }

    #[test]
    fn test_search_collection_scope() {
        let results = searcher()
            .search("quick fox", &CollectionScope::stream("posts"), &SearchOptions::new())
            .unwrap();
        assert_eq!(ids(&results), vec!["en-post"]);
    }

    #[test]
    fn test_search_limit() {
        let results = searcher()
            .search(
                "quick fox",
                &CollectionScope::Any,
                &SearchOptions::new().with_limit(1),
            )
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_invalid_phrase_skips_store() {
        let store = Arc::new(MockStore::default());
        let searcher = TieredSearcher::new(
            Arc::clone(&store),
            Arc::new(StaticSchema::default()),
            Arc::new(FixedLocale::new("en")),
        );

        let results = searcher
            .search("+- <>", &CollectionScope::Any, &SearchOptions::new())
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(store.calls(), 0);
    }

    #[test]
    fn test_store_errors_propagate() {
        let store = Arc::new(MockStore::default().with_failure("deadlock"));
        let searcher = TieredSearcher::new(
            Arc::clone(&store),
            Arc::new(StaticSchema::default()),
            Arc::new(FixedLocale::new("en")),
        );

        let err = searcher
            .search("fox", &CollectionScope::Any, &SearchOptions::new())
            .unwrap_err();
        assert!(matches!(err, SearchError::StoreExecution(_)));
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn test_schema_mismatch_propagates() {
        let schema = StaticSchema::new(FieldSet::new(
            vec!["headline".into()],
            vec!["searchable".into()],
        ));
        let searcher = TieredSearcher::new(
            Arc::new(MemoryStore::new().with_documents(corpus()).unwrap()),
            Arc::new(schema),
            Arc::new(FixedLocale::new("en")),
        );

        let err = searcher
            .search("fox", &CollectionScope::Any, &SearchOptions::new())
            .unwrap_err();
        assert!(matches!(err, SearchError::SchemaMismatch(_)));
    }

    #[test]
    fn test_scoping_keeps_columns_and_order() {
        let searcher = searcher();
        let unscoped = QueryCompiler::default().compile("quick fox").unwrap();
        let scoped = searcher
            .build_expression(
                "quick fox",
                &CollectionScope::streams(["pages", "posts"]),
                &SearchOptions::new().with_locale("de"),
            )
            .unwrap();

        assert_eq!(scoped.columns, unscoped.columns);
        assert_eq!(scoped.order, unscoped.order);
        assert_eq!(scoped.filter, unscoped.filter);
        assert_eq!(
            scoped.restrictions,
            vec![
                Predicate::field_equals("locale", "de"),
                Predicate::FieldIn {
                    field: "stream".into(),
                    values: vec!["pages".into(), "posts".into()],
                },
            ]
        );
    }

    #[test]
    fn test_threshold_option_overrides_default() {
        let searcher = searcher().with_threshold(5.0);
        assert_eq!(searcher.threshold(), 5.0);

        let expr = searcher
            .build_expression("fox", &CollectionScope::Any, &SearchOptions::new())
            .unwrap();
        assert!(matches!(
            &expr.filter,
            Predicate::Any(parts) if parts[0] == Predicate::score_at_least("primary_score", 5.0)
        ));

        let expr = searcher
            .build_expression(
                "fox",
                &CollectionScope::Any,
                &SearchOptions::new().with_threshold(1.5),
            )
            .unwrap();
        assert!(matches!(
            &expr.filter,
            Predicate::Any(parts) if parts[0] == Predicate::score_at_least("primary_score", 1.5)
        ));
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let store = Arc::new(MockStore::default());
        let searcher = TieredSearcher::new(
            Arc::clone(&store),
            Arc::new(StaticSchema::default()),
            Arc::new(FixedLocale::new("en")),
        );

        for bad in [f64::NAN, -1.0] {
            let err = searcher
                .search(
                    "fox",
                    &CollectionScope::Any,
                    &SearchOptions::new().with_threshold(bad),
                )
                .unwrap_err();
            assert!(matches!(err, SearchError::Config(_)));
        }
        assert_eq!(store.calls(), 0);

        let err = scoped_expression(
            &StaticSchema::default(),
            "fox",
            "en",
            &CollectionScope::Any,
            f64::INFINITY,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn test_searcher_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TieredSearcher<MemoryStore, StaticSchema, FixedLocale>>();
    }
}
