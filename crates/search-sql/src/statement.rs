//! Rendered SQL statements with bound parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Number(f64),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => write!(f, "{:?}", s),
            SqlParam::Number(n) => write!(f, "{}", n),
        }
    }
}

/// SQL text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlStatement {
    /// Number of `?` placeholders in the SQL text.
    ///
    /// Question marks inside backtick-quoted identifiers and string
    /// literals are not placeholders.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;
        let mut chars = self.sql.chars();
        while let Some(c) = chars.next() {
            match (quote, c) {
                (Some('\''), '\\') => {
                    chars.next();
                }
                (Some(open), c) if c == open => quote = None,
                (Some(_), _) => {}
                (None, '`' | '\'') => quote = Some(c),
                (None, '?') => count += 1,
                (None, _) => {}
            }
        }
        count
    }

    /// Text parameters only, in order.
    pub fn text_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter_map(|p| match p {
                SqlParam::Text(s) => Some(s.as_str()),
                SqlParam::Number(_) => None,
            })
            .collect()
    }
}
