//! # search-query
//!
//! Tiered relevance query compiler.
//!
//! Turns a free-text phrase into one backend-agnostic [`QueryExpression`]
//! that ranks documents across four tiers.
//!
//! ## Pipeline
//!
//! - **Tokenizer**: strips boolean operator symbols and splits on spaces
//! - **Weighter**: marks terms of three or more bytes as required
//!   prefix matches (`+term*`)
//! - **Compiler**: builds primary, secondary, per-term and fallback tiers,
//!   OR-combines their predicates and orders by tier score
//!
//! ## Usage
//!
//! ```rust
//! use search_query::QueryCompiler;
//!
//! let expr = QueryCompiler::default().compile("quick fox").unwrap();
//! assert_eq!(expr.columns[0].alias, "primary_score");
//! assert_eq!(expr.columns[0].matcher.against(), "+quick* +fox*");
//! assert_eq!(expr.order.len(), 4);
//! ```

pub mod compiler;
pub mod expression;
pub mod tier;
pub mod tokenizer;
pub mod types;
pub mod weighter;

pub use compiler::{QueryCompiler, TierPlan, DEFAULT_THRESHOLD};
pub use expression::{
    Direction, OrderKey, PhraseMatch, Predicate, QueryExpression, ScoreColumn, SubstringMatch,
};
pub use tier::{ScoreTier, TierKind, TierMatch};
pub use tokenizer::{sanitize, strip_reserved, tokenize, RESERVED_SYMBOLS};
pub use types::{join_terms, Term};
pub use weighter::{weigh, weigh_all, MIN_REQUIRED_LEN};
