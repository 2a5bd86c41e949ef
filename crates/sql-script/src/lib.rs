//! # SQL Script Crate
//!
//! Turns parsed source records into one SQL initialization script.
//!
//! ## Components
//!
//! - **escape**: Render text values as safe SQL literals
//! - **schema**: DROP and CREATE statements for the four tables
//! - **statement**: `InsertStatement` for users, movies, ratings and tags
//! - **generator**: Read the sources and assemble/write the script
//!
//! ## Example Usage
//!
//! ```ignore
//! use sql_script::{GeneratorConfig, ScriptGenerator};
//!
//! let report = ScriptGenerator::new(GeneratorConfig::in_dir("."))
//!     .write()?;
//! println!("{} bytes written to {}", report.size_bytes, report.output.display());
//! ```

pub mod escape;
pub mod generator;
pub mod schema;
pub mod statement;

pub use escape::{sql_literal, sql_nullable_number, sql_text};
pub use generator::{
    DEFAULT_OUTPUT, GenerateError, GeneratedScript, GenerationReport, GeneratorConfig,
    LINE_SEPARATOR, RecordCounts, ScriptGenerator, SourcePaths, assemble_script,
};
pub use schema::TABLES;
pub use statement::{InsertStatement, render_all};
