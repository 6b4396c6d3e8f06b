//! Store contract consumed by the searcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use search_query::QueryExpression;
use search_types::{RankedResult, SearchError};

/// Executes compiled query expressions against a content store.
///
/// Implementations must compute every score column, select rows matching
/// `expr.predicate()`, order them by `expr.order` and apply `limit`.
/// Unknown columns fail with [`SearchError::SchemaMismatch`]; any other
/// failure is [`SearchError::StoreExecution`].
pub trait StoreClient: Send + Sync {
    fn execute(
        &self,
        expr: &QueryExpression,
        limit: Option<usize>,
    ) -> Result<Vec<RankedResult>, SearchError>;
}

/// Store double that records every call and returns canned results.
#[derive(Default)]
pub struct MockStore {
    /// Results returned on success
    pub results: Vec<RankedResult>,
    /// Failure message returned instead of results
    pub failure: Option<String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<QueryExpression>>,
}

impl MockStore {
    pub fn with_results(mut self, results: Vec<RankedResult>) -> Self {
        self.results = results;
        self
    }

    /// Fail every call with a store execution error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of executed queries.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Expressions received, in call order.
    pub fn expressions(&self) -> Vec<QueryExpression> {
        match self.seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StoreClient for MockStore {
    fn execute(
        &self,
        expr: &QueryExpression,
        limit: Option<usize>,
    ) -> Result<Vec<RankedResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.seen.lock() {
            Ok(mut seen) => seen.push(expr.clone()),
            Err(poisoned) => poisoned.into_inner().push(expr.clone()),
        }

        if let Some(message) = &self.failure {
            return Err(SearchError::StoreExecution(message.clone()));
        }

        let results = self.results.iter().cloned();
        Ok(match limit {
            Some(limit) => results.take(limit).collect(),
            None => results.collect(),
        })
    }
}
