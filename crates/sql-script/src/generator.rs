//! Script assembly: sources in, one initialization script out.
//!
//! The script is laid out as
//!
//! 1. header comment with the generation time
//! 2. DROP statements
//! 3. CREATE statements
//! 4. users, movies, ratings, tags INSERTs (in that order)
//! 5. trailer comment
//!
//! Users and movies come before ratings and tags because the latter
//! reference the former.

use crate::schema::{CREATE_TABLES, DROP_TABLES};
use crate::statement::render_all;
use chrono::{Local, NaiveDateTime};
use data_loader::{DataLoadError, MalformedLinePolicy, SkippedLine, SourceKind, parser};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default name of the generated script
pub const DEFAULT_OUTPUT: &str = "db_init.sql";

/// Line separator of the platform the script is written on
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const HEADER: &str = "-- Initialization script for movies_rating.db";
const DATA_SECTION: &str = "-- Data load";
const TRAILER: &str = "-- Database initialization complete";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Errors
// =============================================================================

#[derive(Error, Debug)]
pub enum GenerateError {
    /// One or more sources are absent; nothing was parsed or written
    #[error("Missing source files: {}", files.join(", "))]
    MissingInputs { files: Vec<String> },

    #[error(transparent)]
    Parse(#[from] DataLoadError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GenerateError>;

// =============================================================================
// Configuration
// =============================================================================

/// Locations of the four source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub users: PathBuf,
    pub movies: PathBuf,
    pub ratings: PathBuf,
    pub tags: PathBuf,
}

impl SourcePaths {
    /// Sources with their default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            users: dir.join(SourceKind::Users.file_name()),
            movies: dir.join(SourceKind::Movies.file_name()),
            ratings: dir.join(SourceKind::Ratings.file_name()),
            tags: dir.join(SourceKind::Tags.file_name()),
        }
    }

    pub fn path(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Users => &self.users,
            SourceKind::Movies => &self.movies,
            SourceKind::Ratings => &self.ratings,
            SourceKind::Tags => &self.tags,
        }
    }

    /// Every source path that does not exist, in load order
    pub fn missing(&self) -> Vec<String> {
        SourceKind::ALL
            .iter()
            .map(|&kind| self.path(kind))
            .filter(|path| !path.exists())
            .map(|path| path.display().to_string())
            .collect()
    }
}

/// Everything the generator needs to know about one run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub sources: SourcePaths,
    pub output: PathBuf,
    pub policy: MalformedLinePolicy,
}

impl GeneratorConfig {
    /// Default sources and output inside `dir`, lenient parsing
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            sources: SourcePaths::in_dir(dir),
            output: dir.join(DEFAULT_OUTPUT),
            policy: MalformedLinePolicy::default(),
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Number of statements emitted per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub users: usize,
    pub movies: usize,
    pub ratings: usize,
    pub tags: usize,
}

impl RecordCounts {
    pub fn get(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::Users => self.users,
            SourceKind::Movies => self.movies,
            SourceKind::Ratings => self.ratings,
            SourceKind::Tags => self.tags,
        }
    }
}

/// A fully assembled script that has not been written anywhere yet
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    pub text: String,
    pub counts: RecordCounts,
    /// User lines dropped under [`MalformedLinePolicy::Lenient`]
    pub skipped_users: Vec<SkippedLine>,
}

/// Summary of a script written to disk
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub counts: RecordCounts,
    pub skipped_users: usize,
    pub size_bytes: u64,
}

// =============================================================================
// Assembly
// =============================================================================

/// Join the fixed sections and the per-table statements into one script.
///
/// `inserts` holds the rendered statements of each table in load order.
/// Given the same arguments the output is byte-for-byte identical.
pub fn assemble_script(generated_at: NaiveDateTime, inserts: &[Vec<String>]) -> String {
    let generated = format!("-- Generated: {}", generated_at.format(TIMESTAMP_FORMAT));
    let statement_count: usize = inserts.iter().map(Vec::len).sum();

    let mut lines: Vec<&str> =
        Vec::with_capacity(DROP_TABLES.len() + CREATE_TABLES.len() + statement_count + 16);
    lines.push(HEADER);
    lines.push(&generated);
    lines.push("");
    lines.extend_from_slice(DROP_TABLES);
    lines.push("");
    lines.extend_from_slice(CREATE_TABLES);
    lines.push("");
    lines.push(DATA_SECTION);
    lines.push("");
    for table in inserts {
        lines.extend(table.iter().map(String::as_str));
        lines.push("");
    }
    lines.push(TRAILER);

    lines.join(LINE_SEPARATOR)
}

/// Builds the initialization script from the configured sources.
///
/// ## Usage
/// ```ignore
/// let report = ScriptGenerator::new(GeneratorConfig::in_dir("data")).write()?;
/// println!("wrote {} bytes", report.size_bytes);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    config: GeneratorConfig,
    generated_at: Option<NaiveDateTime>,
}

impl ScriptGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            generated_at: None,
        }
    }

    /// Pin the timestamp written into the header (defaults to local now)
    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parse every source and assemble the script in memory.
    ///
    /// All four sources must exist; otherwise this fails before any of them
    /// is read, listing every missing file.
    pub fn generate(&self) -> Result<GeneratedScript> {
        let missing = self.config.sources.missing();
        if !missing.is_empty() {
            return Err(GenerateError::MissingInputs { files: missing });
        }

        let sources = &self.config.sources;

        info!("Processing users from {}", sources.users.display());
        let users = parser::parse_users(&sources.users, self.config.policy)?;
        if !users.skipped.is_empty() {
            warn!(
                skipped = users.skipped.len(),
                "some user lines were malformed and skipped"
            );
        }

        info!("Processing movies from {}", sources.movies.display());
        let movies = parser::parse_movies(&sources.movies)?;

        info!("Processing ratings from {}", sources.ratings.display());
        let ratings = parser::parse_ratings(&sources.ratings)?;

        info!("Processing tags from {}", sources.tags.display());
        let tags = parser::parse_tags(&sources.tags)?;

        let counts = RecordCounts {
            users: users.records.len(),
            movies: movies.len(),
            ratings: ratings.len(),
            tags: tags.len(),
        };

        let inserts = [
            render_all(&users.records),
            render_all(&movies),
            render_all(&ratings),
            render_all(&tags),
        ];
        let generated_at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());

        Ok(GeneratedScript {
            text: assemble_script(generated_at, &inserts),
            counts,
            skipped_users: users.skipped,
        })
    }

    /// Generate the script and write it to the configured output.
    ///
    /// The output file is only touched once the whole script is assembled.
    pub fn write(&self) -> Result<GenerationReport> {
        let script = self.generate()?;
        let output = &self.config.output;

        std::fs::write(output, script.text.as_bytes()).map_err(|source| GenerateError::Write {
            path: output.display().to_string(),
            source,
        })?;

        info!(
            output = %output.display(),
            bytes = script.text.len(),
            "SQL script written"
        );

        Ok(GenerationReport {
            output: output.clone(),
            counts: script.counts,
            skipped_users: script.skipped_users.len(),
            size_bytes: script.text.len() as u64,
        })
    }
}
