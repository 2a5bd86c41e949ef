//! Parsers for the four source files.
//!
//! - users.txt: id|name|email|gender|register_date|occupation
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//! - tags.csv: userId,movieId,tag,timestamp
//!
//! Every parser reads its whole file before returning and keeps the source
//! row order, since ratings and tags get their row ids from insertion order.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use crate::year::extract_year_from_title;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Number of pipe-delimited fields a user line must have
pub const USER_FIELD_COUNT: usize = 6;

/// Read a whole UTF-8 source file into memory.
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// users.txt
// =============================================================================

/// Parse a single pipe-delimited user line.
///
/// Fields past the sixth are ignored.
fn parse_user_line(file: &str, line: &str, line_no: usize) -> Result<User> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < USER_FIELD_COUNT {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            expected: USER_FIELD_COUNT,
            found: parts.len(),
            line: line_no,
        });
    }

    let id = parts[0].parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid user id {:?}: {}", parts[0], e),
    })?;

    Ok(User {
        id,
        name: parts[1].to_string(),
        email: parts[2].to_string(),
        gender: parts[3].to_string(),
        register_date: parts[4].to_string(),
        occupation: parts[5].to_string(),
    })
}

/// Parse the users.txt file
///
/// Blank lines are ignored. A line with fewer than six fields or a
/// non-numeric id is handled according to `policy`.
pub fn parse_users(path: &Path, policy: MalformedLinePolicy) -> Result<Parsed<User>> {
    let file = file_label(path);
    let content = read_source(path)?;
    let mut parsed = Parsed::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        match parse_user_line(&file, line_trimmed, line_no) {
            Ok(user) => parsed.records.push(user),
            Err(err) => match policy {
                MalformedLinePolicy::Strict => return Err(err),
                MalformedLinePolicy::Lenient => {
                    warn!(file = %file, line = line_no, "skipping malformed line: {}", err);
                    parsed.skipped.push(SkippedLine {
                        line: line_no,
                        reason: err.to_string(),
                    });
                }
            },
        }
    }

    debug!(
        file = %file,
        records = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "parsed users"
    );
    Ok(parsed)
}

// =============================================================================
// CSV sources
// =============================================================================

/// Deserialize every row of a header + comma-separated file.
///
/// Columns are matched by header name, so column order in the file does
/// not matter and unknown columns are ignored.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = file_label(path);
    let content = read_source(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| DataLoadError::Csv {
            file: file.clone(),
            source,
        })?;
        rows.push(row);
    }

    debug!(file = %file, rows = rows.len(), "parsed csv");
    Ok(rows)
}

/// Raw movies.csv row before the year is derived
#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    id: MovieId,
    title: String,
    genres: String,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            year: extract_year_from_title(&row.title),
            title: row.title,
            genres: row.genres,
        }
    }
}

/// Parse the movies.csv file
///
/// Titles containing commas are quoted in the source, e.g.
/// `"American President, The (1995)"`.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let rows: Vec<MovieRow> = read_csv(path)?;
    Ok(rows.into_iter().map(Movie::from).collect())
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    read_csv(path)
}

/// Parse the tags.csv file
pub fn parse_tags(path: &Path) -> Result<Vec<Tag>> {
    read_csv(path)
}
