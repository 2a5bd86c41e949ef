//! DDL for the destination schema.
//!
//! Statements are kept as line slices so the assembler can join them with
//! the platform line separator like every other line of the script.

/// Destination tables in load order
pub const TABLES: [&str; 4] = ["users", "movies", "ratings", "tags"];

/// Drops every table, dependents first
pub const DROP_TABLES: &[&str] = &[
    "-- Drop existing tables",
    "DROP TABLE IF EXISTS tags;",
    "DROP TABLE IF EXISTS ratings;",
    "DROP TABLE IF EXISTS movies;",
    "DROP TABLE IF EXISTS users;",
];

pub const CREATE_TABLES: &[&str] = &[
    "-- Create tables",
    "CREATE TABLE users (",
    "    id INTEGER PRIMARY KEY,",
    "    name TEXT NOT NULL,",
    "    email TEXT NOT NULL,",
    "    gender TEXT NOT NULL,",
    "    register_date TEXT NOT NULL,",
    "    occupation TEXT NOT NULL",
    ");",
    "",
    "CREATE TABLE movies (",
    "    id INTEGER PRIMARY KEY,",
    "    title TEXT NOT NULL,",
    "    year INTEGER,",
    "    genres TEXT",
    ");",
    "",
    "CREATE TABLE ratings (",
    "    id INTEGER PRIMARY KEY AUTOINCREMENT,",
    "    user_id INTEGER NOT NULL,",
    "    movie_id INTEGER NOT NULL,",
    "    rating REAL NOT NULL,",
    "    timestamp INTEGER NOT NULL,",
    "    FOREIGN KEY (user_id) REFERENCES users(id),",
    "    FOREIGN KEY (movie_id) REFERENCES movies(id)",
    ");",
    "",
    "CREATE TABLE tags (",
    "    id INTEGER PRIMARY KEY AUTOINCREMENT,",
    "    user_id INTEGER NOT NULL,",
    "    movie_id INTEGER NOT NULL,",
    "    tag TEXT NOT NULL,",
    "    timestamp INTEGER NOT NULL,",
    "    FOREIGN KEY (user_id) REFERENCES users(id),",
    "    FOREIGN KEY (movie_id) REFERENCES movies(id)",
    ");",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_order_is_reverse_of_load_order() {
        let dropped: Vec<&str> = DROP_TABLES
            .iter()
            .filter_map(|l| l.strip_prefix("DROP TABLE IF EXISTS "))
            .map(|l| l.trim_end_matches(';'))
            .collect();
        let mut expected = TABLES.to_vec();
        expected.reverse();
        assert_eq!(dropped, expected);
    }

    #[test]
    fn test_every_table_is_created() {
        for table in TABLES {
            let header = format!("CREATE TABLE {} (", table);
            assert!(CREATE_TABLES.contains(&header.as_str()), "missing {}", table);
        }
    }
}
