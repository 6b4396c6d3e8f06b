//! Scoring tiers.
//!
//! A tier is one matching strategy. Scored tiers compute a relevance column,
//! select rows whose column reaches the threshold, and add an ordering key.
//! The fallback tier only selects rows.
//!
//! Priority order: primary, secondary, per-term (by position), fallback.

use serde::{Deserialize, Serialize};

use crate::expression::{OrderKey, PhraseMatch, Predicate, ScoreColumn, SubstringMatch};
use crate::types::Term;

/// Which strategy a tier implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    /// All terms against the primary fields
    Primary,
    /// All terms against the secondary (searchable blob) fields
    Secondary,
    /// One term against the primary fields; position is 1-based
    PerTerm { position: usize },
    /// Literal substring of the raw phrase
    Fallback,
}

impl TierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierKind::Primary => "primary",
            TierKind::Secondary => "secondary",
            TierKind::PerTerm { .. } => "per_term",
            TierKind::Fallback => "fallback",
        }
    }

    /// Ordering precedence; lower sorts first.
    pub fn priority(&self) -> u32 {
        match self {
            TierKind::Primary => 0,
            TierKind::Secondary => 1,
            TierKind::PerTerm { position } => 1 + *position as u32,
            TierKind::Fallback => u32::MAX,
        }
    }

    /// Alias of the score column, if the tier is scored.
    pub fn column_alias(&self) -> Option<String> {
        match self {
            TierKind::Primary => Some("primary_score".to_string()),
            TierKind::Secondary => Some("secondary_score".to_string()),
            TierKind::PerTerm { position } => Some(format!("term_score_{}", position)),
            TierKind::Fallback => None,
        }
    }
}

/// What a tier matches with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierMatch {
    /// Full-text match; produces a score
    Phrase(PhraseMatch),
    /// Substring matches, OR-combined; no score
    Substring(Vec<SubstringMatch>),
}

/// One scoring strategy built for a specific phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    /// Human-readable name ("primary", "term 2", ...)
    pub name: String,
    pub kind: TierKind,
    /// Columns the tier matches against, in order
    pub fields: Vec<String>,
    pub expression: TierMatch,
    /// Minimum score to count as a hit; None for the fallback
    pub threshold: Option<f64>,
    /// Ordering precedence; lower sorts first
    pub priority: u32,
}

impl ScoreTier {
    fn scored(kind: TierKind, name: String, fields: &[String], terms: Vec<Term>, threshold: f64) -> Self {
        Self {
            name,
            kind,
            fields: fields.to_vec(),
            expression: TierMatch::Phrase(PhraseMatch::new(fields.to_vec(), terms)),
            threshold: Some(threshold),
            priority: kind.priority(),
        }
    }

    /// Every term against the primary fields.
    pub fn primary(fields: &[String], terms: &[Term], threshold: f64) -> Self {
        Self::scored(
            TierKind::Primary,
            "primary".to_string(),
            fields,
            terms.to_vec(),
            threshold,
        )
    }

    /// Every term against the secondary fields.
    pub fn secondary(fields: &[String], terms: &[Term], threshold: f64) -> Self {
        Self::scored(
            TierKind::Secondary,
            "secondary".to_string(),
            fields,
            terms.to_vec(),
            threshold,
        )
    }

    /// A single term against the primary fields.
    pub fn per_term(position: usize, fields: &[String], term: &Term, threshold: f64) -> Self {
        Self::scored(
            TierKind::PerTerm { position },
            format!("term {}", position),
            fields,
            vec![term.clone()],
            threshold,
        )
    }

    /// Raw phrase as a substring of each field.
    pub fn fallback(fields: &[String], phrase: &str) -> Self {
        let matches = fields
            .iter()
            .map(|f| SubstringMatch::new(f.clone(), phrase))
            .collect();
        Self {
            name: "fallback".to_string(),
            kind: TierKind::Fallback,
            fields: fields.to_vec(),
            expression: TierMatch::Substring(matches),
            threshold: None,
            priority: TierKind::Fallback.priority(),
        }
    }

    /// The computed score column, for scored tiers.
    pub fn score_column(&self) -> Option<ScoreColumn> {
        match (&self.expression, self.kind.column_alias()) {
            (TierMatch::Phrase(matcher), Some(alias)) => Some(ScoreColumn::new(alias, matcher.clone())),
            _ => None,
        }
    }

    /// The selection predicate contributed to the OR-combined filter.
    pub fn predicate(&self) -> Predicate {
        match &self.expression {
            TierMatch::Phrase(_) => {
                let alias = self.kind.column_alias().unwrap_or_default();
                Predicate::score_at_least(alias, self.threshold.unwrap_or(0.0))
            }
            TierMatch::Substring(matches) => Predicate::any(
                matches
                    .iter()
                    .cloned()
                    .map(Predicate::Substring)
                    .collect(),
            ),
        }
    }

    /// Descending order key, for scored tiers.
    pub fn order_key(&self) -> Option<OrderKey> {
        match self.expression {
            TierMatch::Phrase(_) => self.kind.column_alias().map(OrderKey::desc),
            TierMatch::Substring(_) => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self.expression, TierMatch::Phrase(_))
    }
}
