//! Error types for the data-loader crate.
//!
//! Every variant that comes from a specific record carries the source file
//! name and the 1-based line number so a bad row can be found quickly.

use thiserror::Error;

/// Errors that can occur while reading and parsing the source files
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the input (bad quoting, wrong column count, ...)
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected at least {expected} fields but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
