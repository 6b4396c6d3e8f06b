//! MySQL rendering of query expressions.
//!
//! Score columns become `MATCH (...) AGAINST (...)` select expressions.
//! MySQL cannot reference a select alias in WHERE, so score predicates
//! repeat the full MATCH expression; ORDER BY uses the aliases. Every
//! user-derived string is bound as a parameter.

use search_query::{Predicate, QueryExpression, ScoreColumn};
use search_types::{MatchMode, Settings};
use tracing::debug;

use crate::escape::{contains_pattern, quote_ident};
use crate::statement::{SqlParam, SqlStatement};

/// Default table holding searchable items.
const DEFAULT_TABLE: &str = "search_items";

/// Renders [`QueryExpression`]s into MySQL statements.
#[derive(Debug, Clone)]
pub struct MySqlRenderer {
    table: String,
    match_mode: MatchMode,
}

impl Default for MySqlRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE)
    }
}

impl MySqlRenderer {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            match_mode: MatchMode::Boolean,
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Renderer for the configured table and match mode.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.table.clone()).with_match_mode(settings.match_mode)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Render a full SELECT statement.
    pub fn render(&self, expr: &QueryExpression, limit: Option<usize>) -> SqlStatement {
        let mut params = Vec::new();
        let mut lines = Vec::with_capacity(5);

        let mut select = String::from("SELECT *");
        for column in &expr.columns {
            select.push_str(", ");
            select.push_str(&self.match_sql(column, &mut params));
            select.push_str(" AS ");
            select.push_str(&quote_ident(&column.alias));
        }
        lines.push(select);

        lines.push(format!("FROM {}", quote_ident(&self.table)));

        let predicate = expr.predicate();
        lines.push(format!("WHERE {}", self.predicate_sql(&predicate, expr, &mut params)));

        if !expr.order.is_empty() {
            let keys: Vec<String> = expr
                .order
                .iter()
                .map(|key| format!("{} {}", quote_ident(&key.column), key.direction.as_str()))
                .collect();
            lines.push(format!("ORDER BY {}", keys.join(", ")));
        }

        if let Some(limit) = limit {
            lines.push(format!("LIMIT {}", limit));
        }

        let statement = SqlStatement {
            sql: lines.join("\n"),
            params,
        };

        debug!(
            table = %self.table,
            mode = self.match_mode.as_str(),
            params = statement.params.len(),
            "Rendered MySQL statement"
        );

        statement
    }

    fn match_sql(&self, column: &ScoreColumn, params: &mut Vec<SqlParam>) -> String {
        let fields: Vec<String> = column
            .matcher
            .fields
            .iter()
            .map(|f| quote_ident(f))
            .collect();
        params.push(SqlParam::Text(column.matcher.against()));
        let modifier = match self.match_mode {
            MatchMode::Boolean => " IN BOOLEAN MODE",
            MatchMode::NaturalLanguage => "",
        };
        format!("MATCH ({}) AGAINST (?{})", fields.join(", "), modifier)
    }

    fn predicate_sql(
        &self,
        predicate: &Predicate,
        expr: &QueryExpression,
        params: &mut Vec<SqlParam>,
    ) -> String {
        match predicate {
            Predicate::ScoreAtLeast { column, min } => {
                let score = match expr.column(column) {
                    Some(score_column) => self.match_sql(score_column, params),
                    // Unknown alias: the store rejects it at execution time
                    None => quote_ident(column),
                };
                params.push(SqlParam::Number(*min));
                format!("{} >= ?", score)
            }
            Predicate::Substring(m) => {
                params.push(SqlParam::Text(contains_pattern(&m.needle)));
                format!("LOWER({}) LIKE LOWER(?) ESCAPE '\\\\'", quote_ident(&m.field))
            }
            Predicate::FieldEquals { field, value } => {
                params.push(SqlParam::Text(value.clone()));
                format!("{} = ?", quote_ident(field))
            }
            Predicate::FieldIn { field, values } => {
                if values.is_empty() {
                    return "1 = 0".to_string();
                }
                params.extend(values.iter().cloned().map(SqlParam::Text));
                let placeholders = vec!["?"; values.len()].join(", ");
                format!("{} IN ({})", quote_ident(field), placeholders)
            }
            Predicate::Any(parts) => self.join_sql(parts, " OR ", "1 = 0", expr, params),
            Predicate::All(parts) => self.join_sql(parts, " AND ", "1 = 1", expr, params),
        }
    }

    fn join_sql(
        &self,
        parts: &[Predicate],
        separator: &str,
        empty: &str,
        expr: &QueryExpression,
        params: &mut Vec<SqlParam>,
    ) -> String {
        match parts {
            [] => empty.to_string(),
            [single] => self.predicate_sql(single, expr, params),
            _ => {
                let rendered: Vec<String> = parts
                    .iter()
                    .map(|p| self.predicate_sql(p, expr, params))
                    .collect();
                format!("({})", rendered.join(separator))
            }
        }
    }
}
