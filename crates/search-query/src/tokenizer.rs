//! Phrase sanitizing and tokenizing.
//!
//! Removes the boolean-mode operator symbols from user input, splits the
//! remainder on single spaces and weighs each token.

use search_types::SearchError;

use crate::types::Term;
use crate::weighter::weigh_all;

/// Characters with operator meaning in boolean full-text syntax.
pub const RESERVED_SYMBOLS: [char; 8] = ['-', '+', '<', '>', '@', '(', ')', '~'];

/// Remove every reserved operator symbol from the phrase.
pub fn strip_reserved(phrase: &str) -> String {
    phrase
        .chars()
        .filter(|c| !RESERVED_SYMBOLS.contains(c))
        .collect()
}

/// Split on single spaces, keeping empty tokens.
///
/// `"a  b"` yields `["a", "", "b"]`.
pub fn split_tokens(stripped: &str) -> Vec<String> {
    stripped.split(' ').map(str::to_string).collect()
}

/// Strip, split and weigh a phrase.
///
/// Never fails; the result may consist only of empty terms.
pub fn tokenize(phrase: &str) -> Vec<Term> {
    weigh_all(split_tokens(&strip_reserved(phrase)))
}

/// Turn a raw phrase into ordered search terms.
///
/// Empty terms produced by repeated spaces are kept in place. Fails with
/// [`SearchError::InvalidPhrase`] when no non-empty term remains.
pub fn sanitize(phrase: &str) -> Result<Vec<Term>, SearchError> {
    let terms = tokenize(phrase);
    if terms.iter().all(Term::is_empty) {
        return Err(SearchError::InvalidPhrase(phrase.to_string()));
    }
    Ok(terms)
}
