//! INSERT rendering for the source records.

use crate::escape::{sql_nullable_number, sql_text};
use data_loader::{Movie, Rating, Tag, User};

/// A record that becomes exactly one INSERT statement.
///
/// Textual fields go through the escaper; identifiers and numbers are
/// embedded bare.
pub trait InsertStatement {
    fn insert_sql(&self) -> String;
}

impl InsertStatement for User {
    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO users (id, name, email, gender, register_date, occupation) VALUES ({}, {}, {}, {}, {}, {});",
            self.id,
            sql_text(&self.name),
            sql_text(&self.email),
            sql_text(&self.gender),
            sql_text(&self.register_date),
            sql_text(&self.occupation),
        )
    }
}

impl InsertStatement for Movie {
    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO movies (id, title, year, genres) VALUES ({}, {}, {}, {});",
            self.id,
            sql_text(&self.title),
            sql_nullable_number(self.year),
            sql_text(&self.genres),
        )
    }
}

// Ratings and tags leave `id` out so the store numbers them in row order.

impl InsertStatement for Rating {
    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO ratings (user_id, movie_id, rating, timestamp) VALUES ({}, {}, {}, {});",
            self.user_id, self.movie_id, self.rating, self.timestamp,
        )
    }
}

impl InsertStatement for Tag {
    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO tags (user_id, movie_id, tag, timestamp) VALUES ({}, {}, {}, {});",
            self.user_id,
            self.movie_id,
            sql_text(&self.tag),
            self.timestamp,
        )
    }
}

/// Render every record of a slice, keeping order
pub fn render_all<T: InsertStatement>(records: &[T]) -> Vec<String> {
    records.iter().map(InsertStatement::insert_sql).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_insert() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            gender: "F".to_string(),
            register_date: "2020-01-01".to_string(),
            occupation: "engineer".to_string(),
        };
        assert_eq!(
            user.insert_sql(),
            "INSERT INTO users (id, name, email, gender, register_date, occupation) VALUES (1, 'Alice', 'alice@example.com', 'F', '2020-01-01', 'engineer');"
        );
    }

    #[test]
    fn test_movie_insert_with_year() {
        let movie = Movie {
            id: 1,
            title: "Toy Story (1995)".to_string(),
            year: Some(1995),
            genres: "Adventure|Animation|Children|Comedy|Fantasy".to_string(),
        };
        assert_eq!(
            movie.insert_sql(),
            "INSERT INTO movies (id, title, year, genres) VALUES (1, 'Toy Story (1995)', 1995, 'Adventure|Animation|Children|Comedy|Fantasy');"
        );
    }

    #[test]
    fn test_movie_insert_without_year() {
        let movie = Movie {
            id: 42,
            title: "Unknown Movie".to_string(),
            year: None,
            genres: "Drama".to_string(),
        };
        assert_eq!(
            movie.insert_sql(),
            "INSERT INTO movies (id, title, year, genres) VALUES (42, 'Unknown Movie', NULL, 'Drama');"
        );
    }

    #[test]
    fn test_movie_title_is_escaped() {
        let movie = Movie {
            id: 7,
            title: "Schindler's List (1993)".to_string(),
            year: Some(1993),
            genres: "Drama|War".to_string(),
        };
        assert!(movie.insert_sql().contains("'Schindler''s List (1993)'"));
    }

    #[test]
    fn test_rating_insert() {
        let rating = Rating {
            user_id: 1,
            movie_id: 31,
            rating: "2.5".parse().unwrap(),
            timestamp: 1260759144,
        };
        assert_eq!(
            rating.insert_sql(),
            "INSERT INTO ratings (user_id, movie_id, rating, timestamp) VALUES (1, 31, 2.5, 1260759144);"
        );
    }

    #[test]
    fn test_rating_text_is_embedded_verbatim() {
        let rating = Rating {
            user_id: 1,
            movie_id: 1,
            rating: "4.123456789".parse().unwrap(),
            timestamp: 964982703,
        };
        assert_eq!(
            rating.insert_sql(),
            "INSERT INTO ratings (user_id, movie_id, rating, timestamp) VALUES (1, 1, 4.123456789, 964982703);"
        );
    }

    #[test]
    fn test_wide_ids_are_embedded_bare() {
        let tag = Tag {
            user_id: 5_000_000_000,
            movie_id: -1,
            tag: "odd".to_string(),
            timestamp: 1,
        };
        assert!(tag.insert_sql().contains("VALUES (5000000000, -1, 'odd', 1);"));
    }

    #[test]
    fn test_tag_insert_escapes_text() {
        let tag = Tag {
            user_id: 15,
            movie_id: 339,
            tag: "it's fun".to_string(),
            timestamp: 1138537770,
        };
        assert_eq!(
            tag.insert_sql(),
            "INSERT INTO tags (user_id, movie_id, tag, timestamp) VALUES (15, 339, 'it''s fun', 1138537770);"
        );
    }

    #[test]
    fn test_render_all_keeps_order() {
        let ratings: Vec<Rating> = (1..=3)
            .map(|movie_id| Rating {
                user_id: 1,
                movie_id,
                rating: "4.0".parse().unwrap(),
                timestamp: 0,
            })
            .collect();
        let rendered = render_all(&ratings);
        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("VALUES (1, 1, 4.0, 0)"));
        assert!(rendered[2].contains("VALUES (1, 3, 4.0, 0)"));
    }
}
