//! Release year extraction from movie titles.

use regex::Regex;
use std::sync::LazyLock;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("year pattern is valid"));

/// Extract year from movie title
///
/// Looks for a parenthesized run of exactly four digits anywhere in the
/// title. When there are several, the first one wins.
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    let captures = YEAR_PATTERN.captures(title)?;
    captures.get(1)?.as_str().parse().ok()
}
