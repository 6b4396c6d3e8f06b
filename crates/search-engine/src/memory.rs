//! In-process reference store.
//!
//! [`MemoryStore`] executes a [`QueryExpression`] over documents held in
//! memory, with the same contract a relational full-text store offers:
//! computed score columns, OR-combined predicates and multi-key ordering.
//! Full-text scores and identity restrictions are answered by a tantivy
//! [`TextIndex`] rebuilt whenever the documents change.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use search_query::{Direction, Predicate, QueryExpression, SubstringMatch};
use search_types::{
    Document, RankedResult, SearchError, TierScore, DESCRIPTION_FIELD, SEARCHABLE_FIELD,
    TITLE_FIELD,
};
use tracing::debug;

use crate::document::{load_corpus, parse_corpus};
use crate::index::{TextIndex, DEFAULT_MIN_TOKEN_LEN, IDENTITY_COLUMNS};
use crate::store::StoreClient;

/// Documents held in memory, scored through a tantivy index.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    documents: Vec<Document>,
    text_fields: BTreeSet<String>,
    min_token_len: usize,
    /// None until the first reindex, and after configuration changes
    index: Option<TextIndex>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store declaring the standard text fields.
    pub fn new() -> Self {
        let text_fields = [TITLE_FIELD, DESCRIPTION_FIELD, SEARCHABLE_FIELD]
            .iter()
            .map(|f| f.to_string())
            .collect();
        Self {
            documents: Vec::new(),
            text_fields,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            index: None,
        }
    }

    /// Minimum indexed word length; applies from the next reindex.
    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self.index = None;
        self
    }

    /// Declare an extra text column; applies from the next reindex.
    pub fn with_text_field(mut self, field: impl Into<String>) -> Self {
        self.text_fields.insert(field.into());
        self.index = None;
        self
    }

    /// Add documents and index them.
    pub fn with_documents(
        mut self,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<Self, SearchError> {
        for doc in documents {
            self.upsert(doc);
        }
        self.reindex()?;
        Ok(self)
    }

    /// Store loaded from a JSON corpus string.
    pub fn from_json_str(json: &str) -> Result<Self, SearchError> {
        Self::new().with_documents(parse_corpus(json)?)
    }

    /// Store loaded from a JSON corpus file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        Self::new().with_documents(load_corpus(path)?)
    }

    /// Add a document, replacing any document with the same id in place,
    /// and reindex.
    ///
    /// The document's text fields become known columns.
    pub fn insert(&mut self, doc: Document) -> Result<(), SearchError> {
        self.upsert(doc);
        self.reindex()
    }

    fn upsert(&mut self, doc: Document) {
        for field in doc.fields.keys() {
            if !self.text_fields.contains(field) {
                self.text_fields.insert(field.clone());
            }
        }
        match self.documents.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => self.documents.push(doc),
        }
    }

    /// Rebuild the text index from the current documents and settings.
    pub fn reindex(&mut self) -> Result<(), SearchError> {
        self.index = Some(self.build_index()?);
        Ok(())
    }

    fn build_index(&self) -> Result<TextIndex, SearchError> {
        TextIndex::build(&self.documents, &self.text_fields, self.min_token_len)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    /// Whether the text index reflects the current documents and settings.
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Whether `name` is a column of this store.
    pub fn has_column(&self, name: &str) -> bool {
        IDENTITY_COLUMNS.contains(&name) || self.text_fields.contains(name)
    }

    /// Reject queries that reference unknown columns or aliases.
    fn check_schema(&self, expr: &QueryExpression) -> Result<(), SearchError> {
        for field in expr.referenced_fields() {
            if !self.has_column(&field) {
                return Err(SearchError::SchemaMismatch(format!(
                    "unknown column `{}`",
                    field
                )));
            }
        }
        for column in &expr.columns {
            for field in &column.matcher.fields {
                if !self.text_fields.contains(field) {
                    return Err(SearchError::SchemaMismatch(format!(
                        "column `{}` has no full-text index",
                        field
                    )));
                }
            }
        }
        for key in &expr.order {
            if expr.column(&key.column).is_none() {
                return Err(SearchError::StoreExecution(format!(
                    "unknown order column `{}`",
                    key.column
                )));
            }
        }
        check_score_aliases(&expr.predicate(), expr)
    }

    /// Rows where `field` holds one of `values`.
    fn rows_with(
        &self,
        index: &TextIndex,
        field: &str,
        values: &[String],
    ) -> Result<Vec<bool>, SearchError> {
        if let Some(rows) = index.identity_rows(field, values)? {
            return Ok(rows);
        }
        Ok(self
            .documents
            .iter()
            .map(|doc| {
                doc.column(field)
                    .is_some_and(|v| values.iter().any(|candidate| candidate == v))
            })
            .collect())
    }

    /// Resolve column restrictions against the index once per query.
    fn resolve<'a>(
        &self,
        predicate: &'a Predicate,
        index: &TextIndex,
    ) -> Result<RowFilter<'a>, SearchError> {
        Ok(match predicate {
            Predicate::ScoreAtLeast { column, min } => RowFilter::Score {
                column: column.as_str(),
                min: *min,
            },
            Predicate::Substring(m) => RowFilter::Substring(m),
            Predicate::FieldEquals { field, value } => {
                RowFilter::Rows(self.rows_with(index, field, std::slice::from_ref(value))?)
            }
            Predicate::FieldIn { field, values } => {
                RowFilter::Rows(self.rows_with(index, field, values)?)
            }
            Predicate::Any(parts) => RowFilter::Any(
                parts
                    .iter()
                    .map(|part| self.resolve(part, index))
                    .collect::<Result<_, _>>()?,
            ),
            Predicate::All(parts) => RowFilter::All(
                parts
                    .iter()
                    .map(|part| self.resolve(part, index))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

fn check_score_aliases(predicate: &Predicate, expr: &QueryExpression) -> Result<(), SearchError> {
    match predicate {
        Predicate::ScoreAtLeast { column, .. } if expr.column(column).is_none() => Err(
            SearchError::StoreExecution(format!("unknown score column `{}`", column)),
        ),
        Predicate::Any(parts) | Predicate::All(parts) => parts
            .iter()
            .try_for_each(|part| check_score_aliases(part, expr)),
        _ => Ok(()),
    }
}

/// A predicate with its column restrictions resolved to row sets.
enum RowFilter<'a> {
    Score { column: &'a str, min: f64 },
    Substring(&'a SubstringMatch),
    Rows(Vec<bool>),
    Any(Vec<RowFilter<'a>>),
    All(Vec<RowFilter<'a>>),
}

impl RowFilter<'_> {
    fn holds(&self, row: usize, doc: &Document, scores: &HashMap<&str, f64>) -> bool {
        match self {
            RowFilter::Score { column, min } => {
                scores.get(column).is_some_and(|score| *score >= *min)
            }
            RowFilter::Substring(m) => doc
                .column(&m.field)
                .unwrap_or("")
                .to_lowercase()
                .contains(&m.needle.to_lowercase()),
            RowFilter::Rows(rows) => rows.get(row).copied().unwrap_or(false),
            RowFilter::Any(parts) => parts.iter().any(|p| p.holds(row, doc, scores)),
            RowFilter::All(parts) => parts.iter().all(|p| p.holds(row, doc, scores)),
        }
    }
}

impl StoreClient for MemoryStore {
    fn execute(
        &self,
        expr: &QueryExpression,
        limit: Option<usize>,
    ) -> Result<Vec<RankedResult>, SearchError> {
        self.check_schema(expr)?;

        let rebuilt;
        let index = match &self.index {
            Some(index) => index,
            None => {
                debug!("Text index is stale, building for this query");
                rebuilt = self.build_index()?;
                &rebuilt
            }
        };

        let column_scores = expr
            .columns
            .iter()
            .map(|column| index.score_all(&column.matcher.fields, &column.matcher.terms))
            .collect::<Result<Vec<_>, _>>()?;

        let predicate = expr.predicate();
        let filter = self.resolve(&predicate, index)?;

        let mut results = Vec::new();
        for (row, doc) in self.documents.iter().enumerate() {
            let scores: HashMap<&str, f64> = expr
                .columns
                .iter()
                .zip(&column_scores)
                .map(|(column, per_row)| (column.alias.as_str(), per_row[row]))
                .collect();

            if !filter.holds(row, doc, &scores) {
                continue;
            }

            let tier_scores = expr
                .columns
                .iter()
                .zip(&column_scores)
                .map(|(column, per_row)| TierScore::new(column.alias.clone(), per_row[row]))
                .collect();
            results.push(RankedResult::new(doc.id.clone(), tier_scores));
        }

        // Stable: ties keep insertion order
        results.sort_by(|a, b| {
            for key in &expr.order {
                let left = a.score(&key.column).unwrap_or(0.0);
                let right = b.score(&key.column).unwrap_or(0.0);
                let ordering = match key.direction {
                    Direction::Desc => right.total_cmp(&left),
                    Direction::Asc => left.total_cmp(&right),
                };
                if ordering.is_ne() {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });

        if let Some(limit) = limit {
            results.truncate(limit);
        }

        debug!(
            documents = self.documents.len(),
            matched = results.len(),
            "Executed query in memory store"
        );

        Ok(results)
    }
}
