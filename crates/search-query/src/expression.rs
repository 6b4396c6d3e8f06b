//! Backend-agnostic query expressions.
//!
//! A [`QueryExpression`] describes one query: the score columns to compute,
//! the restrictions every row must pass, the OR-combined tier filter, and
//! the ordering keys. Backends render it into their own syntax (SQL for a
//! relational full-text index) or evaluate it directly.

use serde::{Deserialize, Serialize};

use crate::types::{join_terms, Term};

/// Boolean full-text match of a term list over one or more fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMatch {
    /// Fields matched together as one full-text index
    pub fields: Vec<String>,
    /// Terms in phrase order
    pub terms: Vec<Term>,
}

impl PhraseMatch {
    pub fn new(fields: Vec<String>, terms: Vec<Term>) -> Self {
        Self { fields, terms }
    }

    /// The boolean-syntax string handed to the full-text engine.
    pub fn against(&self) -> String {
        join_terms(&self.terms)
    }
}

/// Case-insensitive substring match of a literal needle in one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstringMatch {
    pub field: String,
    /// Matched literally; no operator processing
    pub needle: String,
}

impl SubstringMatch {
    pub fn new(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            needle: needle.into(),
        }
    }
}

/// A computed relevance column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreColumn {
    /// Output alias, unique within a query
    pub alias: String,
    pub matcher: PhraseMatch,
}

impl ScoreColumn {
    pub fn new(alias: impl Into<String>, matcher: PhraseMatch) -> Self {
        Self {
            alias: alias.into(),
            matcher,
        }
    }
}

/// Sort direction for an order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Orders results by a score column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderKey {
    pub column: String,
    pub direction: Direction,
}

impl OrderKey {
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// Row selection predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The named score column is at least `min`
    ScoreAtLeast { column: String, min: f64 },
    /// Case-insensitive substring match
    Substring(SubstringMatch),
    /// Exact column equality
    FieldEquals { field: String, value: String },
    /// Column value is one of `values`
    FieldIn { field: String, values: Vec<String> },
    /// At least one part holds
    Any(Vec<Predicate>),
    /// Every part holds
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn score_at_least(column: impl Into<String>, min: f64) -> Self {
        Predicate::ScoreAtLeast {
            column: column.into(),
            min,
        }
    }

    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// OR-combine predicates, flattening nested `Any`.
    pub fn any(parts: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::Any(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Predicate::Any(flat)
    }

    /// AND-combine predicates, flattening nested `All`.
    pub fn all(parts: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::All(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Predicate::All(flat)
    }

    /// Columns this predicate reads directly (score columns excluded).
    pub fn referenced_fields(&self, out: &mut Vec<String>) {
        match self {
            Predicate::ScoreAtLeast { .. } => {}
            Predicate::Substring(m) => push_unique(out, &m.field),
            Predicate::FieldEquals { field, .. } | Predicate::FieldIn { field, .. } => {
                push_unique(out, field)
            }
            Predicate::Any(parts) | Predicate::All(parts) => {
                for part in parts {
                    part.referenced_fields(out);
                }
            }
        }
    }
}

fn push_unique(out: &mut Vec<String>, field: &str) {
    if !out.iter().any(|f| f == field) {
        out.push(field.to_string());
    }
}

/// One complete query.
///
/// Rows are selected when every restriction holds and the filter holds.
/// Restrictions never add score columns or order keys, so scoping a query
/// cannot change how its matches are ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExpression {
    /// Score columns in output order
    pub columns: Vec<ScoreColumn>,
    /// AND-ed restrictions (locale, collection scope), in application order
    pub restrictions: Vec<Predicate>,
    /// OR-combined tier filter
    pub filter: Predicate,
    /// Ordering keys in precedence order
    pub order: Vec<OrderKey>,
}

impl QueryExpression {
    pub fn new(columns: Vec<ScoreColumn>, filter: Predicate, order: Vec<OrderKey>) -> Self {
        Self {
            columns,
            restrictions: Vec::new(),
            filter,
            order,
        }
    }

    /// AND an extra restriction onto the query.
    pub fn restrict(mut self, restriction: Predicate) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Look up a score column by alias.
    pub fn column(&self, alias: &str) -> Option<&ScoreColumn> {
        self.columns.iter().find(|c| c.alias == alias)
    }

    /// The complete selection predicate: restrictions AND filter.
    pub fn predicate(&self) -> Predicate {
        let mut parts = self.restrictions.clone();
        parts.push(self.filter.clone());
        Predicate::all(parts)
    }

    /// Every store column the query reads, in first-use order.
    pub fn referenced_fields(&self) -> Vec<String> {
        let mut out = Vec::new();
        for column in &self.columns {
            for field in &column.matcher.fields {
                push_unique(&mut out, field);
            }
        }
        for restriction in &self.restrictions {
            restriction.referenced_fields(&mut out);
        }
        self.filter.referenced_fields(&mut out);
        out
    }
}
