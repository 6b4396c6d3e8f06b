//! Ranked search results.

use serde::{Deserialize, Serialize};

/// Score a single tier's column produced for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierScore {
    /// Score column alias (e.g. "primary_score", "term_score_2")
    pub column: String,
    /// Full-text relevance; 0.0 when the tier did not match
    pub score: f64,
}

impl TierScore {
    pub fn new(column: impl Into<String>, score: f64) -> Self {
        Self {
            column: column.into(),
            score,
        }
    }
}

/// A document together with every score column the query computed.
///
/// A document appears at most once per result set. Its position in the
/// result set is decided by the tier ordering, not by a merged score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Document ID
    pub document_id: String,
    /// Score columns in query column order
    pub tier_scores: Vec<TierScore>,
}

impl RankedResult {
    pub fn new(document_id: impl Into<String>, tier_scores: Vec<TierScore>) -> Self {
        Self {
            document_id: document_id.into(),
            tier_scores,
        }
    }

    /// Look up a score column by alias.
    pub fn score(&self, column: &str) -> Option<f64> {
        self.tier_scores
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.score)
    }

    /// The first score column, which is the highest-priority tier.
    pub fn primary_score(&self) -> f64 {
        self.tier_scores.first().map(|s| s.score).unwrap_or(0.0)
    }

    /// Whether any scored tier reached `threshold`.
    ///
    /// False means the document was only found by the substring fallback.
    pub fn has_scored_match(&self, threshold: f64) -> bool {
        self.tier_scores.iter().any(|s| s.score >= threshold)
    }
}
