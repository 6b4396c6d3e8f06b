//! Error types for tiered search.

use thiserror::Error;

/// Unified error type for search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The phrase produced no searchable terms after sanitizing
    #[error("Invalid phrase: no searchable terms in {0:?}")]
    InvalidPhrase(String),

    /// A configured field does not exist in the underlying store
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The store rejected or failed to execute the compiled query
    #[error("Store execution error: {0}")]
    StoreExecution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Whether the error can be recovered locally by returning no results.
    pub fn is_invalid_phrase(&self) -> bool {
        matches!(self, SearchError::InvalidPhrase(_))
    }
}
