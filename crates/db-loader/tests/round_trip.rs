//! End-to-end tests: fixture sources -> generated script -> database.
//!
//! These exercise the generator and the loader together the same way the
//! two CLI stages do, only with explicit paths inside a temp directory.

use db_loader::{DatabaseLoader, LoadError, LoadStage, LoaderConfig};
use rusqlite::Connection;
use sql_script::{GeneratorConfig, ScriptGenerator};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 3 users, 2 movies, 5 ratings, 2 tags
fn write_fixture(dir: &Path) {
    fs::write(
        dir.join("users.txt"),
        "1|Alice|alice@example.com|F|2020-01-01|engineer\n\
         2|Bob O'Brien|bob@example.com|M|2020-02-15|writer\n\
         3|Carol|carol@example.com|F|2021-07-30|doctor\n",
    )
    .unwrap();
    fs::write(
        dir.join("movies.csv"),
        "movieId,title,genres\n\
         1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
         2,\"Unknown Movie, The\",Drama\n",
    )
    .unwrap();
    fs::write(
        dir.join("ratings.csv"),
        "userId,movieId,rating,timestamp\n\
         1,1,4.0,964982703\n\
         1,2,3.5,964981247\n\
         2,1,5.0,964982224\n\
         3,1,2.5,964983815\n\
         3,2,1.0,964982931\n",
    )
    .unwrap();
    fs::write(
        dir.join("tags.csv"),
        "userId,movieId,tag,timestamp\n\
         2,1,pixar,1445714994\n\
         3,2,\"it's slow, but fine\",1445714996\n",
    )
    .unwrap();
}

fn generate(dir: &Path) -> GeneratorConfig {
    let config = GeneratorConfig::in_dir(dir);
    ScriptGenerator::new(config.clone()).write().unwrap();
    config
}

#[test]
fn test_round_trip_counts() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    generate(dir.path());

    let report = DatabaseLoader::new(LoaderConfig::in_dir(dir.path()))
        .run()
        .unwrap();

    assert_eq!(report.counts.get("users"), Some(3));
    assert_eq!(report.counts.get("movies"), Some(2));
    assert_eq!(report.counts.get("ratings"), Some(5));
    assert_eq!(report.counts.get("tags"), Some(2));
}

#[test]
fn test_round_trip_values() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    generate(dir.path());

    let config = LoaderConfig::in_dir(dir.path());
    DatabaseLoader::new(config.clone()).run().unwrap();

    let conn = Connection::open(&config.database).unwrap();

    let name: String = conn
        .query_row("SELECT name FROM users WHERE id = 2", [], |r| r.get(0))
        .unwrap();
    assert_eq!(name, "Bob O'Brien");

    let year: Option<i64> = conn
        .query_row("SELECT year FROM movies WHERE id = 1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(year, Some(1995));

    let year: Option<i64> = conn
        .query_row("SELECT year FROM movies WHERE id = 2", [], |r| r.get(0))
        .unwrap();
    assert_eq!(year, None);

    let tag: String = conn
        .query_row("SELECT tag FROM tags WHERE user_id = 3", [], |r| r.get(0))
        .unwrap();
    assert_eq!(tag, "it's slow, but fine");

    // Auto-assigned ids follow source row order
    let ids: Vec<(i64, f64)> = conn
        .prepare("SELECT id, rating FROM ratings ORDER BY id")
        .unwrap()
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        ids,
        vec![(1, 4.0), (2, 3.5), (3, 5.0), (4, 2.5), (5, 1.0)]
    );
}

#[test]
fn test_loader_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    generate(dir.path());

    let config = LoaderConfig::in_dir(dir.path());
    let first = DatabaseLoader::new(config.clone()).run().unwrap();
    let second = DatabaseLoader::new(config).run().unwrap();

    assert!(!first.replaced_existing);
    assert!(second.replaced_existing);
    assert_eq!(first.counts, second.counts);
}

#[test]
fn test_foreign_keys_enforced_on_request() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    // Rating for a user that does not exist
    fs::write(
        dir.path().join("ratings.csv"),
        "userId,movieId,rating,timestamp\n99,1,4.0,964982703\n",
    )
    .unwrap();
    generate(dir.path());

    let lenient = DatabaseLoader::new(LoaderConfig::in_dir(dir.path()))
        .run()
        .unwrap();
    assert_eq!(lenient.counts.get("ratings"), Some(1));

    let mut config = LoaderConfig::in_dir(dir.path());
    config.enforce_foreign_keys = true;
    let mut loader = DatabaseLoader::new(config);
    let err = loader.run().unwrap_err();

    assert!(matches!(err, LoadError::Batch(_)));
    assert_eq!(loader.stage(), LoadStage::Failed);
    assert_eq!(
        loader.failure().unwrap().last_completed,
        LoadStage::Created
    );
}

#[test]
fn test_missing_source_leaves_no_script() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    fs::remove_file(dir.path().join("tags.csv")).unwrap();

    let config = GeneratorConfig::in_dir(dir.path());
    assert!(ScriptGenerator::new(config.clone()).write().is_err());
    assert!(!config.output.exists());

    let err = DatabaseLoader::new(LoaderConfig::in_dir(dir.path()))
        .run()
        .unwrap_err();
    assert!(matches!(err, LoadError::ScriptNotFound { .. }));
}
