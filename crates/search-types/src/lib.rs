//! # search-types
//!
//! Shared domain types for tiered search.
//!
//! This crate defines the data structures used throughout the workspace:
//! - Documents: searchable records owned by the content store
//! - Field sets: which columns the primary and secondary tiers match
//! - Options and scopes: per-call locale, threshold and collection filters
//! - Ranked results: document ids with their per-tier score columns
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use search_types::{CollectionScope, SearchOptions};
//!
//! let options = SearchOptions::new().with_locale("en").with_threshold(3.0);
//! let scope = CollectionScope::stream("pages");
//! assert!(scope.contains("pages"));
//! assert_eq!(options.threshold, Some(3.0));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod options;
pub mod result;

pub use config::{check_threshold, MatchMode, Settings};
pub use document::{Document, FieldSet, DESCRIPTION_FIELD, SEARCHABLE_FIELD, TITLE_FIELD};
pub use error::SearchError;
pub use options::{CollectionScope, SearchOptions};
pub use result::{RankedResult, TierScore};
