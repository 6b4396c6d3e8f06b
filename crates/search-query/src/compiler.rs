//! Tiered query compilation.
//!
//! Builds the tier plan for a phrase and lowers it into one
//! [`QueryExpression`]:
//!
//! 1. Primary: all terms against the primary fields
//! 2. Secondary: all terms against the secondary fields
//! 3. Per-term: each term alone against the primary fields, only when the
//!    phrase has more than one term, so a single strong term still surfaces
//!    a document whose combined score stays below the threshold
//! 4. Fallback: the raw phrase as a substring of every field
//!
//! All tier predicates are OR-combined. Ordering keys follow tier priority;
//! the fallback adds none, so fallback-only rows sort last.

use search_types::{FieldSet, SearchError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::expression::{Predicate, QueryExpression};
use crate::tier::{ScoreTier, TierKind};
use crate::tokenizer::sanitize;
use crate::types::Term;

/// Default minimum score for the scored tiers.
pub const DEFAULT_THRESHOLD: f64 = 3.0;

/// The tiers built for one phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPlan {
    /// Raw phrase as the caller passed it
    pub phrase: String,
    /// Sanitized, weighted terms
    pub terms: Vec<Term>,
    /// Tiers in priority order
    pub tiers: Vec<ScoreTier>,
}

impl TierPlan {
    /// Tiers of the given kind.
    pub fn tiers_of(&self, kind: TierKind) -> impl Iterator<Item = &ScoreTier> {
        self.tiers.iter().filter(move |t| t.kind == kind)
    }

    /// Per-term tiers in term order.
    pub fn per_term_tiers(&self) -> impl Iterator<Item = &ScoreTier> {
        self.tiers
            .iter()
            .filter(|t| matches!(t.kind, TierKind::PerTerm { .. }))
    }

    /// Tiers sorted by priority; equal priorities keep plan order.
    pub fn ranked_tiers(&self) -> Vec<&ScoreTier> {
        let mut ranked: Vec<&ScoreTier> = self.tiers.iter().collect();
        ranked.sort_by_key(|t| t.priority);
        ranked
    }

    /// Lower the plan into a single query expression.
    ///
    /// Columns, predicates and order keys follow tier priority.
    pub fn to_expression(&self) -> QueryExpression {
        let ranked = self.ranked_tiers();
        let columns = ranked.iter().filter_map(|t| t.score_column()).collect();
        let filter = Predicate::any(ranked.iter().map(|t| t.predicate()).collect());
        let order = ranked.iter().filter_map(|t| t.order_key()).collect();
        QueryExpression::new(columns, filter, order)
    }
}

/// Compiles phrases into tiered query expressions.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    fields: FieldSet,
    threshold: f64,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(FieldSet::default())
    }
}

impl QueryCompiler {
    /// Create a compiler with the default threshold.
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the minimum score for the scored tiers.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Sanitize the phrase and build its tier plan.
    ///
    /// Fails with [`SearchError::InvalidPhrase`] when the phrase has no terms.
    pub fn plan(&self, phrase: &str) -> Result<TierPlan, SearchError> {
        let terms = sanitize(phrase)?;
        Ok(self.plan_terms(phrase, terms))
    }

    /// Build the tier plan for already-sanitized terms.
    ///
    /// Field existence is not checked here; the store reports unknown
    /// columns when it executes the query.
    pub fn plan_terms(&self, phrase: &str, terms: Vec<Term>) -> TierPlan {
        let mut tiers = Vec::with_capacity(3 + terms.len());

        tiers.push(ScoreTier::primary(&self.fields.primary, &terms, self.threshold));
        tiers.push(ScoreTier::secondary(&self.fields.secondary, &terms, self.threshold));

        if terms.len() > 1 {
            for (index, term) in terms.iter().enumerate() {
                tiers.push(ScoreTier::per_term(
                    index + 1,
                    &self.fields.primary,
                    term,
                    self.threshold,
                ));
            }
        }

        tiers.push(ScoreTier::fallback(&self.fields.fallback_fields(), phrase));

        debug!(
            phrase,
            terms = terms.len(),
            tiers = tiers.len(),
            threshold = self.threshold,
            "Built tier plan"
        );

        TierPlan {
            phrase: phrase.to_string(),
            terms,
            tiers,
        }
    }

    /// Sanitize, plan and lower a phrase in one step.
    pub fn compile(&self, phrase: &str) -> Result<QueryExpression, SearchError> {
        Ok(self.plan(phrase)?.to_expression())
    }
}
