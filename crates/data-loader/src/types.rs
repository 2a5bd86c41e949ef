//! Core domain types for the movie-rating sources.
//!
//! This module defines the records read from the four source files and the
//! small amount of metadata the rest of the pipeline needs about them
//! (file names, table names, how malformed lines are treated).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (SQLite `INTEGER`, so any i64)
pub type UserId = i64;

/// Unique identifier for a movie
pub type MovieId = i64;

// =============================================================================
// Records
// =============================================================================

/// A user record from `users.txt` (`id|name|email|gender|register_date|occupation`).
///
/// Every textual field is kept verbatim; escaping happens when the record is
/// turned into a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub register_date: String,
    pub occupation: String,
}

/// A movie record from `movies.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    ///
    /// `None` when the title carries no parenthesized four-digit year.
    pub year: Option<u16>,
    /// Genres exactly as they appear in the source, e.g. `Adventure|Comedy`
    pub genres: String,
}

/// A single rating event from `ratings.csv`
///
/// The row id is assigned by the store, so it is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: RatingValue,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

/// A free-text tag event from `tags.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub tag: String,
    pub timestamp: i64,
}

/// A rating score kept exactly as written in the source.
///
/// The text is checked to be a finite number on the way in and rendered
/// back verbatim, so `4.123456789` or `4.50` survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RatingValue(String);

impl RatingValue {
    /// The source text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the source text
    pub fn value(&self) -> f64 {
        // Checked finite on construction
        self.0.trim().parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for RatingValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(RatingValue(s.to_string())),
            _ => Err(format!("invalid rating {:?}", s)),
        }
    }
}

impl TryFrom<String> for RatingValue {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RatingValue> for String {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Source metadata
// =============================================================================

/// The four kinds of source file, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Users,
    Movies,
    Ratings,
    Tags,
}

impl SourceKind {
    /// All kinds in the order their statements appear in the script.
    /// Users and movies come first because ratings and tags reference them.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Users,
        SourceKind::Movies,
        SourceKind::Ratings,
        SourceKind::Tags,
    ];

    /// Default file name of this source
    pub fn file_name(self) -> &'static str {
        match self {
            SourceKind::Users => "users.txt",
            SourceKind::Movies => "movies.csv",
            SourceKind::Ratings => "ratings.csv",
            SourceKind::Tags => "tags.csv",
        }
    }

    /// Destination table fed by this source
    pub fn table_name(self) -> &'static str {
        match self {
            SourceKind::Users => "users",
            SourceKind::Movies => "movies",
            SourceKind::Ratings => "ratings",
            SourceKind::Tags => "tags",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

// =============================================================================
// Malformed line handling
// =============================================================================

/// What the pipe-delimited user parser does with a line it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Skip the line, remember it in [`Parsed::skipped`] and log a warning
    #[default]
    Lenient,
    /// Stop parsing and return an error
    Strict,
}

/// A line the lenient parser dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source file
    pub line: usize,
    pub reason: String,
}

/// Records parsed from one source plus whatever was skipped along the way
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedLine>,
}

impl<T> Parsed<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_value_keeps_source_text() {
        for text in ["4.123456789", "4.50", "5", "0.5", "3e0"] {
            let value: RatingValue = text.parse().unwrap();
            assert_eq!(value.to_string(), text);
        }
        assert_eq!("4.50".parse::<RatingValue>().unwrap().value(), 4.5);
    }

    #[test]
    fn test_rating_value_rejects_non_numbers() {
        for text in ["", "abc", "NaN", "inf", "4,5"] {
            assert!(text.parse::<RatingValue>().is_err(), "accepted {:?}", text);
        }
    }
}
