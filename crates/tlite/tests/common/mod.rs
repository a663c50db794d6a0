//! Shared test fixtures: each test gets its own database file in a
//! temporary directory that is removed when the fixture drops.

use std::path::PathBuf;

use tempfile::TempDir;
use tokio_rusqlite::Connection;

pub struct TestDatabase {
    // Held so the directory outlives the test.
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("test.db");
        Self { _dir: dir, path }
    }

    pub async fn connect(&self) -> Connection {
        tlite::db::open_database(self.path.clone())
            .await
            .expect("open test database")
    }
}

/// Run a batch of SQL statements against the connection.
pub async fn exec_batch(conn: &Connection, sql: &'static str) {
    conn.call(move |conn| {
        conn.execute_batch(sql)?;
        Ok::<(), tokio_rusqlite::rusqlite::Error>(())
    })
    .await
    .expect("seed SQL");
}
