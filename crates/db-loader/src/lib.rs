//! # DB Loader Crate
//!
//! Materializes the database file from a generated SQL script and reads
//! back a row count per table as a smoke check.
//!
//! ## Components
//!
//! - **stage**: `LoadStage` lifecycle and `LoadFailure`
//! - **loader**: `DatabaseLoader`, which walks a load through its stages
//! - **error**: Error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use db_loader::{DatabaseLoader, LoaderConfig};
//!
//! let mut loader = DatabaseLoader::new(LoaderConfig::default());
//! match loader.run() {
//!     Ok(report) => println!("{} bytes", report.size_bytes),
//!     Err(err) => eprintln!("failed in stage {:?}: {}", loader.failure(), err),
//! }
//! ```

pub mod error;
pub mod loader;
pub mod stage;

pub use error::{LoadError, Result};
pub use loader::{
    DEFAULT_DATABASE, DEFAULT_SCRIPT, DatabaseLoader, LoadReport, LoaderConfig, TableCounts,
};
pub use stage::{LoadFailure, LoadStage};
