//! Tantivy word index for the in-process store.
//!
//! Text columns are analyzed the way a relational full-text index treats
//! them: split on anything that is not alphanumeric, lowercased, and words
//! shorter than the minimum token length dropped. Identity columns (`id`,
//! `locale`, `stream`) are raw `STRING` terms.
//!
//! Relevance follows boolean mode: required terms (`+term*`) must
//! prefix-match an indexed word, optional terms match whole words and only
//! add score. Each matching occurrence adds `3 * (1 + ln(N / df))`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use search_query::Term as SearchTerm;
use search_types::{Document, SearchError};
use tantivy::collector::DocSetCollector;
use tantivy::postings::{Postings, SegmentPostings};
use tantivy::query::{Query, TermQuery, TermSetQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::{
    LowerCaser, SimpleTokenizer, TextAnalyzer, Token, TokenFilter, TokenStream, Tokenizer,
};
use tantivy::{
    DocAddress, DocSet, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
    TERMINATED,
};
use tracing::debug;

/// Default minimum indexed word length.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Columns every document has, indexed as raw terms.
pub const IDENTITY_COLUMNS: [&str; 3] = ["id", "locale", "stream"];

/// Base score of one matching occurrence.
const OCCURRENCE_WEIGHT: f64 = 3.0;

/// Name the word analyzer is registered under.
const WORDS_TOKENIZER: &str = "search_words";

/// Stored position of the document in the store.
const ROW_FIELD: &str = "store_row";

/// Writer memory budget (15MB, tantivy's per-thread minimum)
const WRITER_MEMORY_BYTES: usize = 15_000_000;

fn index_error(err: tantivy::TantivyError) -> SearchError {
    SearchError::StoreExecution(format!("index error: {}", err))
}

/// Token filter that drops words shorter than `min_len` characters.
#[derive(Clone)]
struct MinLengthFilter {
    min_len: usize,
}

impl TokenFilter for MinLengthFilter {
    type Tokenizer<T: Tokenizer> = MinLengthFilterWrapper<T>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> Self::Tokenizer<T> {
        MinLengthFilterWrapper {
            min_len: self.min_len,
            inner: tokenizer,
        }
    }
}

#[derive(Clone)]
struct MinLengthFilterWrapper<T> {
    min_len: usize,
    inner: T,
}

impl<T: Tokenizer> Tokenizer for MinLengthFilterWrapper<T> {
    type TokenStream<'a> = MinLengthTokenStream<T::TokenStream<'a>>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        MinLengthTokenStream {
            min_len: self.min_len,
            tail: self.inner.token_stream(text),
        }
    }
}

struct MinLengthTokenStream<T> {
    min_len: usize,
    tail: T,
}

impl<T: TokenStream> TokenStream for MinLengthTokenStream<T> {
    fn advance(&mut self) -> bool {
        while self.tail.advance() {
            if self.tail.token().text.chars().count() >= self.min_len {
                return true;
            }
        }
        false
    }

    fn token(&self) -> &Token {
        self.tail.token()
    }

    fn token_mut(&mut self) -> &mut Token {
        self.tail.token_mut()
    }
}

/// Analyzer for text columns.
pub fn words_analyzer(min_token_len: usize) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(MinLengthFilter {
            min_len: min_token_len,
        })
        .build()
}

/// In-RAM tantivy index over a snapshot of the store's documents.
#[derive(Clone)]
pub struct TextIndex {
    reader: IndexReader,
    text_fields: BTreeMap<String, Field>,
    identity_fields: BTreeMap<&'static str, Field>,
    /// Store row of every indexed document, by segment then doc id
    rows: Vec<Vec<usize>>,
    num_docs: usize,
}

impl fmt::Debug for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextIndex")
            .field("text_fields", &self.text_fields.keys().collect::<Vec<_>>())
            .field("num_docs", &self.num_docs)
            .finish()
    }
}

impl TextIndex {
    /// Index `documents` in order; row `n` is `documents[n]`.
    ///
    /// Every name in `text_fields` becomes a `TEXT` column analyzed with
    /// [`words_analyzer`].
    pub fn build(
        documents: &[Document],
        text_fields: &BTreeSet<String>,
        min_token_len: usize,
    ) -> Result<Self, SearchError> {
        let mut builder = Schema::builder();
        let row_field = builder.add_u64_field(ROW_FIELD, STORED);

        let identity_fields: BTreeMap<&'static str, Field> = IDENTITY_COLUMNS
            .iter()
            .map(|name| (*name, builder.add_text_field(name, STRING)))
            .collect();

        let indexing = TextFieldIndexing::default()
            .set_tokenizer(WORDS_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqs);
        let text_options = TextOptions::default().set_indexing_options(indexing);

        let mut fields = BTreeMap::new();
        for name in text_fields {
            if IDENTITY_COLUMNS.contains(&name.as_str()) || name == ROW_FIELD {
                continue;
            }
            if name.is_empty() || name.starts_with('-') {
                return Err(SearchError::SchemaMismatch(format!(
                    "invalid column name `{}`",
                    name
                )));
            }
            fields.insert(
                name.clone(),
                builder.add_text_field(name, text_options.clone()),
            );
        }

        let index = Index::create_in_ram(builder.build());
        index
            .tokenizers()
            .register(WORDS_TOKENIZER, words_analyzer(min_token_len));

        let mut writer: IndexWriter = index
            .writer_with_num_threads(1, WRITER_MEMORY_BYTES)
            .map_err(index_error)?;
        for (row, doc) in documents.iter().enumerate() {
            let mut entry = TantivyDocument::default();
            entry.add_u64(row_field, row as u64);
            for (name, field) in &identity_fields {
                if let Some(value) = doc.column(name) {
                    entry.add_text(*field, value);
                }
            }
            for (name, field) in &fields {
                if let Some(text) = doc.field(name) {
                    entry.add_text(*field, text);
                }
            }
            writer.add_document(entry).map_err(index_error)?;
        }
        writer.commit().map_err(index_error)?;

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(index_error)?;

        let searcher = reader.searcher();
        let mut rows = Vec::with_capacity(searcher.segment_readers().len());
        for (ord, segment) in searcher.segment_readers().iter().enumerate() {
            let mut segment_rows = Vec::with_capacity(segment.max_doc() as usize);
            for doc_id in 0..segment.max_doc() {
                let stored: TantivyDocument = searcher
                    .doc(DocAddress::new(ord as u32, doc_id))
                    .map_err(index_error)?;
                let row = stored
                    .get_first(row_field)
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| {
                        SearchError::StoreExecution("indexed document has no row".to_string())
                    })?;
                segment_rows.push(row as usize);
            }
            rows.push(segment_rows);
        }
        let num_docs = searcher.num_docs() as usize;

        debug!(
            documents = num_docs,
            text_fields = fields.len(),
            min_token_len,
            "Built text index"
        );

        Ok(Self {
            reader,
            text_fields: fields,
            identity_fields,
            rows,
            num_docs,
        })
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// Whether `name` is a full-text column of this index.
    pub fn has_text_field(&self, name: &str) -> bool {
        self.text_fields.contains_key(name)
    }

    fn text_field(&self, name: &str) -> Result<Field, SearchError> {
        self.text_fields.get(name).copied().ok_or_else(|| {
            SearchError::SchemaMismatch(format!("column `{}` has no full-text index", name))
        })
    }

    /// Relevance of every row for `terms` matched against `fields`.
    ///
    /// A row missing any required term scores 0.
    pub fn score_all(&self, fields: &[String], terms: &[SearchTerm]) -> Result<Vec<f64>, SearchError> {
        let handles = fields
            .iter()
            .map(|name| self.text_field(name))
            .collect::<Result<Vec<_>, _>>()?;
        let counts = terms
            .iter()
            .map(|term| self.occurrences(&handles, term))
            .collect::<Result<Vec<_>, _>>()?;

        let total = self.num_docs as f64;
        let weights: Vec<f64> = counts
            .iter()
            .map(|per_row| {
                let df = per_row.iter().filter(|c| **c > 0).count();
                if df == 0 {
                    0.0
                } else {
                    OCCURRENCE_WEIGHT * (1.0 + (total / df as f64).ln())
                }
            })
            .collect();

        let scores = (0..self.num_docs)
            .map(|row| {
                let missing_required = terms
                    .iter()
                    .zip(&counts)
                    .any(|(term, per_row)| term.required && per_row[row] == 0);
                if missing_required {
                    return 0.0;
                }
                counts
                    .iter()
                    .zip(&weights)
                    .map(|(per_row, weight)| f64::from(per_row[row]) * weight)
                    .sum()
            })
            .collect();
        Ok(scores)
    }

    /// Occurrences of `term` in each row, summed over `fields`.
    fn occurrences(&self, fields: &[Field], term: &SearchTerm) -> Result<Vec<u32>, SearchError> {
        let mut counts = vec![0u32; self.num_docs];
        let needle = term.text.to_lowercase();
        if needle.is_empty() {
            return Ok(counts);
        }

        let searcher = self.reader.searcher();
        for (ord, segment) in searcher.segment_readers().iter().enumerate() {
            for field in fields {
                let inverted = segment.inverted_index(*field).map_err(index_error)?;
                if term.required {
                    let mut stream = inverted
                        .terms()
                        .range()
                        .ge(needle.as_bytes())
                        .into_stream()?;
                    while stream.advance() {
                        if !stream.key().starts_with(needle.as_bytes()) {
                            break;
                        }
                        let postings = inverted
                            .read_postings_from_terminfo(stream.value(), IndexRecordOption::WithFreqs)?;
                        self.accumulate(ord, postings, &mut counts);
                    }
                } else {
                    let word = Term::from_field_text(*field, &needle);
                    if let Some(postings) =
                        inverted.read_postings(&word, IndexRecordOption::WithFreqs)?
                    {
                        self.accumulate(ord, postings, &mut counts);
                    }
                }
            }
        }
        Ok(counts)
    }

    fn accumulate(&self, segment_ord: usize, mut postings: SegmentPostings, counts: &mut [u32]) {
        let Some(rows) = self.rows.get(segment_ord) else {
            return;
        };
        let mut doc = postings.doc();
        while doc != TERMINATED {
            if let Some(count) = rows.get(doc as usize).and_then(|row| counts.get_mut(*row)) {
                *count += postings.term_freq();
            }
            doc = postings.advance();
        }
    }

    /// Rows whose identity column equals one of `values`.
    ///
    /// Returns `None` when `column` is not an identity column.
    pub fn identity_rows(&self, column: &str, values: &[String]) -> Result<Option<Vec<bool>>, SearchError> {
        let Some(field) = self.identity_fields.get(column).copied() else {
            return Ok(None);
        };

        let mut hits = vec![false; self.num_docs];
        if values.is_empty() {
            return Ok(Some(hits));
        }

        let query: Box<dyn Query> = match values {
            [value] => Box::new(TermQuery::new(
                Term::from_field_text(field, value),
                IndexRecordOption::Basic,
            )),
            _ => Box::new(TermSetQuery::new(
                values.iter().map(|v| Term::from_field_text(field, v)),
            )),
        };

        let searcher = self.reader.searcher();
        let addresses = searcher
            .search(&query, &DocSetCollector)
            .map_err(index_error)?;
        for address in addresses {
            let row = self
                .rows
                .get(address.segment_ord as usize)
                .and_then(|segment| segment.get(address.doc_id as usize));
            if let Some(hit) = row.and_then(|row| hits.get_mut(*row)) {
                *hit = true;
            }
        }
        Ok(Some(hits))
    }
}
