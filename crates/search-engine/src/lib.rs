//! # search-engine
//!
//! Executes tiered search queries.
//!
//! The [`TieredSearcher`] compiles a phrase, scopes it to a locale and a set
//! of collections, and runs it through an injected [`StoreClient`]. The
//! crate ships one store implementation, the in-process [`MemoryStore`],
//! which evaluates expressions with boolean-mode full-text relevance over
//! an in-RAM tantivy index.
//!
//! ## Features
//! - Collaborator traits for the store, the schema and the current locale
//! - Tantivy word index with prefix matching and document-frequency weighting
//! - JSON corpus loading
//! - Call-recording [`MockStore`] for tests
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use search_engine::{FixedLocale, MemoryStore, StaticSchema, TieredSearcher};
//! use search_types::{CollectionScope, Document, SearchOptions};
//!
//! let store = MemoryStore::new()
//!     .with_documents(vec![
//!         Document::new("1", "en", "pages").with_title("The Quick Brown Fox"),
//!     ])
//!     .unwrap();
//! let searcher = TieredSearcher::new(
//!     Arc::new(store),
//!     Arc::new(StaticSchema::default()),
//!     Arc::new(FixedLocale::new("en")),
//! );
//! let results = searcher
//!     .search("quick fox", &CollectionScope::Any, &SearchOptions::new())
//!     .unwrap();
//! assert_eq!(results[0].document_id, "1");
//! ```

pub mod document;
pub mod index;
pub mod memory;
pub mod schema;
pub mod searcher;
pub mod store;

pub use document::{load_corpus, parse_corpus};
pub use index::{words_analyzer, TextIndex, DEFAULT_MIN_TOKEN_LEN, IDENTITY_COLUMNS};
pub use memory::MemoryStore;
pub use schema::{FixedLocale, LocaleProvider, SchemaProvider, StaticSchema};
pub use searcher::{scoped_expression, TieredSearcher};
pub use store::{MockStore, StoreClient};
