//! Identifier quoting and LIKE escaping.

/// Quote a MySQL identifier with backticks, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Escape `\`, `%` and `_` so a value matches literally inside LIKE.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// LIKE pattern matching `value` anywhere in the column.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}
