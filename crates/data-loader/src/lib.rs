//! # Data Loader Crate
//!
//! This crate reads the four movie-rating source files into typed records.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (User, Movie, Rating, Tag, RatingValue, SourceKind)
//! - **parser**: Parse users.txt and the three CSV files into Rust structs
//! - **year**: Derive a release year from a movie title
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parser, MalformedLinePolicy};
//! use std::path::Path;
//!
//! let users = parser::parse_users(Path::new("users.txt"), MalformedLinePolicy::Lenient)?;
//! let movies = parser::parse_movies(Path::new("movies.csv"))?;
//!
//! println!("{} users ({} skipped), {} movies",
//!     users.records.len(), users.skipped.len(), movies.len());
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod types;
pub mod year;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{parse_movies, parse_ratings, parse_tags, parse_users};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    Movie,
    Rating,
    RatingValue,
    Tag,
    User,
    // Source metadata
    MalformedLinePolicy,
    Parsed,
    SkippedLine,
    SourceKind,
};
pub use year::extract_year_from_title;
