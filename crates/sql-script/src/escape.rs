//! Literal rendering for values embedded in generated statements.

use std::fmt::Display;

/// Keyword emitted for an absent value
pub const NULL: &str = "NULL";

/// Render a possibly absent string as a SQL literal.
///
/// `None` becomes the bare `NULL` keyword. Anything else is wrapped in
/// single quotes with every embedded single quote doubled. No other
/// character is touched.
///
/// Example: `Some("O'Neil")` -> `'O''Neil'`
pub fn sql_literal(value: Option<&str>) -> String {
    match value {
        None => NULL.to_string(),
        Some(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('\'');
            for ch in s.chars() {
                if ch == '\'' {
                    out.push('\'');
                }
                out.push(ch);
            }
            out.push('\'');
            out
        }
    }
}

/// Shorthand for a present text value
pub fn sql_text(value: &str) -> String {
    sql_literal(Some(value))
}

/// Render an optional number bare, or `NULL` when absent
pub fn sql_nullable_number<T: Display>(value: Option<T>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => NULL.to_string(),
    }
}
