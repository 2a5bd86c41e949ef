//! Error types for the db-loader crate.

use crate::stage::LoadStage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The SQL script to replay does not exist
    #[error("SQL file '{path}' not found")]
    ScriptNotFound { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The engine rejected the script; the failing statement is not identified
    #[error("Script execution failed: {0}")]
    Batch(#[source] rusqlite::Error),

    #[error("Row count for table {table} failed: {source}")]
    Verify {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A step was called from the wrong stage
    #[error("Cannot move to {attempted} from {current}")]
    OutOfOrder {
        current: LoadStage,
        attempted: LoadStage,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
