//! Core query types: weighted terms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single token taken from a search phrase.
///
/// Required terms render in boolean full-text syntax as `+text*`: the word
/// must be present, and any word starting with `text` counts. Other terms
/// render as their plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Token text with reserved symbols already removed
    pub text: String,
    /// Whether the term must match (prefix) for the document to score
    pub required: bool,
}

impl Term {
    /// Create an optional term.
    pub fn optional(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            required: false,
        }
    }

    /// Create a required term.
    pub fn required(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            required: true,
        }
    }

    /// Empty terms come from repeated spaces in the phrase.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Render in boolean full-text syntax.
    pub fn to_boolean_syntax(&self) -> String {
        if self.required {
            format!("+{}*", self.text)
        } else {
            self.text.clone()
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_boolean_syntax())
    }
}

/// Join terms into one boolean expression, separated by single spaces.
///
/// Empty terms are kept, so repeated spaces survive into the expression.
pub fn join_terms(terms: &[Term]) -> String {
    terms
        .iter()
        .map(Term::to_boolean_syntax)
        .collect::<Vec<_>>()
        .join(" ")
}
