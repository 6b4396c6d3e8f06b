//! Term weighting.
//!
//! Full-text engines do not index words below a minimum length, so a
//! required/prefix operator on a short word would make the whole match fail.
//! Only tokens of at least [`MIN_REQUIRED_LEN`] bytes become required.

use crate::types::Term;

/// Shortest token, in bytes, that is marked required.
pub const MIN_REQUIRED_LEN: usize = 3;

/// Classify a single token.
///
/// Length is counted in UTF-8 bytes, so a two-letter word with an accent
/// is already required.
pub fn weigh(token: &str) -> Term {
    if token.len() >= MIN_REQUIRED_LEN {
        Term::required(token)
    } else {
        Term::optional(token)
    }
}

/// Classify every token, preserving order.
pub fn weigh_all<I, S>(tokens: I) -> Vec<Term>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().map(|t| weigh(t.as_ref())).collect()
}
