//! # search-sql
//!
//! Renders tiered [`QueryExpression`](search_query::QueryExpression)s as
//! parameterized MySQL `SELECT` statements over `FULLTEXT` indexes.
//!
//! ```rust
//! use search_query::QueryCompiler;
//! use search_sql::MySqlRenderer;
//!
//! let expr = QueryCompiler::default().compile("quick fox").unwrap();
//! let stmt = MySqlRenderer::default().render(&expr, Some(10));
//! assert!(stmt.sql.starts_with("SELECT *, MATCH (`title`, `description`)"));
//! assert_eq!(stmt.placeholder_count(), stmt.params.len());
//! ```

pub mod escape;
pub mod renderer;
pub mod statement;

pub use escape::{contains_pattern, escape_like, quote_ident};
pub use renderer::MySqlRenderer;
pub use statement::{SqlParam, SqlStatement};
