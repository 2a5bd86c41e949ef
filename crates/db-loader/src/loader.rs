//! Replays a generated script into a fresh SQLite database.

use crate::error::{LoadError, Result};
use crate::stage::{LoadFailure, LoadStage};
use data_loader::SourceKind;
use rusqlite::Connection;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default script replayed by the loader
pub const DEFAULT_SCRIPT: &str = "db_init.sql";

/// Default database file produced by the loader
pub const DEFAULT_DATABASE: &str = "movies_rating.db";

// =============================================================================
// Configuration and results
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub script: PathBuf,
    pub database: PathBuf,
    /// Turn on `PRAGMA foreign_keys` before the script runs
    pub enforce_foreign_keys: bool,
}

impl LoaderConfig {
    /// Default script and database names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            script: dir.join(DEFAULT_SCRIPT),
            database: dir.join(DEFAULT_DATABASE),
            enforce_foreign_keys: false,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

/// Row count of every destination table, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCounts {
    entries: Vec<(&'static str, u64)>,
}

impl TableCounts {
    pub fn get(&self, table: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == table)
            .map(|&(_, count)| count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Outcome of a successful [`DatabaseLoader::run`]
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub database: PathBuf,
    pub counts: TableCounts,
    /// Whether a database file existed and was deleted first
    pub replaced_existing: bool,
    pub size_bytes: u64,
}

// =============================================================================
// Loader
// =============================================================================

/// Drives one load through its stages.
///
/// Every step checks the current [`LoadStage`] and advances it on success.
/// On failure the loader moves to [`LoadStage::Failed`], remembers the cause
/// and closes the connection; nothing already on disk is cleaned up.
///
/// ## Usage
/// ```ignore
/// let mut loader = DatabaseLoader::new(LoaderConfig::default());
/// let report = loader.run()?;
/// for (table, count) in report.counts.iter() {
///     println!("{table}: {count} records");
/// }
/// ```
#[derive(Debug)]
pub struct DatabaseLoader {
    config: LoaderConfig,
    stage: LoadStage,
    failure: Option<LoadFailure>,
    conn: Option<Connection>,
}

impl DatabaseLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            stage: LoadStage::NotStarted,
            failure: None,
            conn: None,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn stage(&self) -> LoadStage {
        self.stage
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }

    /// Read the script, delete the old database, create a new one, run the
    /// script and count rows. The first failing step ends the run.
    pub fn run(&mut self) -> Result<LoadReport> {
        let script = self.read_script()?;
        let replaced_existing = self.remove_existing()?;
        self.create()?;
        self.execute_script(&script)?;
        let counts = self.verify()?;

        let size_bytes = self.database_size()?;

        Ok(LoadReport {
            database: self.config.database.clone(),
            counts,
            replaced_existing,
            size_bytes,
        })
    }

    /// Read the configured script into memory.
    ///
    /// Only valid before anything else has happened, so a missing script
    /// never costs the existing database.
    pub fn read_script(&mut self) -> Result<String> {
        self.ensure_stage(LoadStage::NotStarted)?;

        let path = &self.config.script;
        let result = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::ScriptNotFound {
                path: path.display().to_string(),
            },
            _ => LoadError::Io {
                path: path.display().to_string(),
                source,
            },
        });
        if let Ok(script) = &result {
            debug!(path = %path.display(), bytes = script.len(), "read SQL script");
        }
        self.record(result)
    }

    /// Delete the database file if there is one. Returns whether it existed.
    pub fn remove_existing(&mut self) -> Result<bool> {
        let next = self.ensure_stage(LoadStage::NotStarted)?;

        let path = &self.config.database;
        let result = match std::fs::remove_file(path) {
            Ok(()) => {
                info!("Removed existing database: {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LoadError::Io {
                path: path.display().to_string(),
                source,
            }),
        };
        let removed = self.record(result)?;
        self.stage = next;
        Ok(removed)
    }

    /// Open a fresh database at the configured path.
    pub fn create(&mut self) -> Result<()> {
        let next = self.ensure_stage(LoadStage::FileRemoved)?;

        let result = open_database(&self.config.database, self.config.enforce_foreign_keys);
        let conn = self.record(result)?;
        self.conn = Some(conn);
        self.stage = next;
        Ok(())
    }

    /// Run the whole script as one batch.
    ///
    /// The script runs in autocommit mode, so it may manage its own
    /// transactions. The first failing statement stops the batch and
    /// surfaces as a single [`LoadError::Batch`]; statements committed
    /// before it stay in the database.
    pub fn execute_script(&mut self, script: &str) -> Result<()> {
        let next = self.ensure_stage(LoadStage::Created)?;

        let result = match self.conn.as_ref() {
            Some(conn) => conn.execute_batch(script).map_err(LoadError::Batch),
            None => Err(LoadError::OutOfOrder {
                current: self.stage,
                attempted: next,
            }),
        };
        self.record(result)?;
        info!("SQL script executed");
        self.stage = next;
        Ok(())
    }

    /// Count the rows of every table and close the connection.
    pub fn verify(&mut self) -> Result<TableCounts> {
        let next = self.ensure_stage(LoadStage::ScriptExecuted)?;

        let result = match self.conn.as_ref() {
            Some(conn) => count_rows(conn),
            None => Err(LoadError::OutOfOrder {
                current: self.stage,
                attempted: next,
            }),
        };
        let counts = self.record(result)?;
        self.conn = None;
        self.stage = next;
        Ok(counts)
    }

    /// Size of the database file on disk
    fn database_size(&mut self) -> Result<u64> {
        let path = &self.config.database;
        let result = std::fs::metadata(path)
            .map(|meta| meta.len())
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            });
        self.record(result)
    }

    /// Check the loader is at `expected` and return the stage the step
    /// moves to on success.
    fn ensure_stage(&self, expected: LoadStage) -> Result<LoadStage> {
        let attempted = expected.next().unwrap_or(LoadStage::Failed);
        if self.stage == expected {
            Ok(attempted)
        } else {
            Err(LoadError::OutOfOrder {
                current: self.stage,
                attempted,
            })
        }
    }

    /// Move to `Failed` when `result` is an error; pass it through either way.
    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(stage = %self.stage, "load failed: {}", err);
            self.failure = Some(LoadFailure {
                last_completed: self.stage,
                cause: err.to_string(),
            });
            self.stage = LoadStage::Failed;
            self.conn = None;
        }
        result
    }
}

fn open_database(path: &Path, enforce_foreign_keys: bool) -> Result<Connection> {
    let open_err = |source: rusqlite::Error| LoadError::Open {
        path: path.display().to_string(),
        source,
    };

    let conn = Connection::open(path).map_err(open_err)?;
    if enforce_foreign_keys {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(open_err)?;
    }
    info!("Created database: {}", path.display());
    Ok(conn)
}

fn count_rows(conn: &Connection) -> Result<TableCounts> {
    let mut entries = Vec::with_capacity(SourceKind::ALL.len());
    for kind in SourceKind::ALL {
        let table = kind.table_name();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .map_err(|source| LoadError::Verify {
                table: table.to_string(),
                source,
            })?;
        debug!(table, count, "counted rows");
        entries.push((table, count as u64));
    }
    Ok(TableCounts { entries })
}
