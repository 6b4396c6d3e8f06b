//! Corpus loading.
//!
//! A corpus is a JSON array of documents:
//!
//! ```json
//! [{"id": "1", "locale": "en", "stream": "pages", "title": "The Quick Brown Fox"}]
//! ```

use std::path::Path;

use search_types::{Document, SearchError};
use tracing::debug;

/// Parse a JSON corpus.
pub fn parse_corpus(json: &str) -> Result<Vec<Document>, SearchError> {
    let documents: Vec<Document> = serde_json::from_str(json)?;
    Ok(documents)
}

/// Read and parse a JSON corpus file.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>, SearchError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let documents = parse_corpus(&json)?;
    debug!(path = ?path, documents = documents.len(), "Loaded corpus");
    Ok(documents)
}
