//! End-to-end test infrastructure for tiered search.
//!
//! Provides a shared TestHarness with a multi-locale, multi-stream corpus
//! and helpers for running searches and generating random phrases.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use search_engine::{load_corpus, FixedLocale, MemoryStore, StaticSchema, TieredSearcher};
use search_types::{CollectionScope, Document, RankedResult, SearchOptions, Settings};

/// Searcher over the in-memory store used by every E2E test.
pub type HarnessSearcher = TieredSearcher<MemoryStore, StaticSchema, FixedLocale>;

/// Shared test harness for E2E tests.
///
/// Holds the sample corpus both in memory and as a JSON file, so tests can
/// exercise the store directly or through corpus loading.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Store loaded with the sample corpus
    pub store: Arc<MemoryStore>,
    /// Path of the corpus written as JSON
    pub corpus_path: PathBuf,
    /// Settings the searcher is built from
    pub settings: Settings,
}

impl TestHarness {
    /// Create a harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a harness with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let corpus_path = temp_dir.path().join("corpus.json");

        let json = serde_json::to_string_pretty(&sample_corpus()).expect("Failed to serialize corpus");
        std::fs::write(&corpus_path, json).expect("Failed to write corpus");

        let corpus = load_corpus(&corpus_path).expect("Failed to load corpus");
        let store = MemoryStore::new()
            .with_min_token_len(settings.min_token_len)
            .with_documents(corpus)
            .expect("Failed to index corpus");

        Self {
            _temp_dir: temp_dir,
            store: Arc::new(store),
            corpus_path,
            settings,
        }
    }

    /// Searcher over the harness store, current locale from settings.
    pub fn searcher(&self) -> HarnessSearcher {
        TieredSearcher::new(
            Arc::clone(&self.store),
            Arc::new(StaticSchema::from_settings(&self.settings)),
            Arc::new(FixedLocale::from_settings(&self.settings)),
        )
        .with_settings(&self.settings)
    }

    /// Search the whole corpus with default options.
    pub fn search(&self, phrase: &str) -> Vec<RankedResult> {
        self.search_with(phrase, &CollectionScope::Any, &SearchOptions::new())
    }

    /// Search with an explicit scope and options.
    pub fn search_with(
        &self,
        phrase: &str,
        scope: &CollectionScope,
        options: &SearchOptions,
    ) -> Vec<RankedResult> {
        self.searcher()
            .search(phrase, scope, options)
            .expect("Search failed")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Document ids of a result list, in rank order.
pub fn result_ids(results: &[RankedResult]) -> Vec<&str> {
    results.iter().map(|r| r.document_id.as_str()).collect()
}

/// Sample corpus covering every tier.
///
/// For the phrase "quick fox" (locale en):
/// - `fox-title`, `news-fox`: primary tier (both words in title/description)
/// - `fox-blob`: secondary tier only (words in the searchable blob)
/// - `quick-only`: per-term tier for "quick"
/// - `fox-only`: per-term tier for "fox"
///
/// `ai-guide` and `cpp-course` are only reachable through the substring
/// fallback for "ai" and "C++". `de-fox` is the German duplicate.
pub fn sample_corpus() -> Vec<Document> {
    vec![
        Document::new("fox-title", "en", "pages")
            .with_title("The Quick Brown Fox")
            .with_description("A classic pangram about a fox"),
        Document::new("fox-blob", "en", "pages")
            .with_title("Wildlife roundup")
            .with_searchable("quick fox sightings near the river"),
        Document::new("quick-only", "en", "pages")
            .with_title("Quick recipes")
            .with_description("Dinner in ten minutes"),
        Document::new("fox-only", "en", "pages").with_title("Fox habitats"),
        Document::new("ai-guide", "en", "pages")
            .with_title("AI in practice")
            .with_description("Applied machine learning"),
        Document::new("cpp-course", "en", "pages").with_title("C++ for beginners"),
        Document::new("csharp-course", "en", "pages").with_title("C# basics"),
        Document::new("de-fox", "de", "pages").with_title("Quick fox auf Deutsch"),
        Document::new("news-fox", "en", "news").with_title("Quick fox spotted in town"),
    ]
}

/// Words used to build random phrases.
const PHRASE_WORDS: [&str; 12] = [
    "quick", "fox", "ai", "brown", "c++", "go", "recipes", "x", "über", "habitats", "news", "the",
];

/// Symbols mixed into random phrases.
const PHRASE_NOISE: [&str; 9] = ["+", "-", "<", ">", "@", "(", ")", "~", "*"];

/// Seeded generator of messy phrases: random words, operator symbols and
/// repeated spaces.
pub struct PhraseGenerator {
    rng: StdRng,
}

impl PhraseGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn phrase(&mut self) -> String {
        let words = self.rng.random_range(1..=4);
        let mut phrase = String::new();
        for i in 0..words {
            if i > 0 {
                let spaces = if self.rng.random_bool(0.2) { 2 } else { 1 };
                phrase.push_str(&" ".repeat(spaces));
            }
            if self.rng.random_bool(0.3) {
                phrase.push_str(PHRASE_NOISE[self.rng.random_range(0..PHRASE_NOISE.len())]);
            }
            phrase.push_str(PHRASE_WORDS[self.rng.random_range(0..PHRASE_WORDS.len())]);
            if self.rng.random_bool(0.2) {
                phrase.push_str(PHRASE_NOISE[self.rng.random_range(0..PHRASE_NOISE.len())]);
            }
        }
        phrase
    }
}
