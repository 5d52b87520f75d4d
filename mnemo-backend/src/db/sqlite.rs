//! SQLite database behind an r2d2 connection pool.
//!
//! Holds the schema migration, including the FTS5 virtual table that indexes
//! note text and summary for full-text search. Per-table operations live in
//! `db/tables/`.

use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    /// True when a write hit a UNIQUE constraint (e.g. duplicate email).
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type DbResult<T> = Result<T, DbError>;

pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub fn new(path: &str) -> DbResult<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = r2d2::Pool::new(manager)?;

        let db = Self { pool };
        db.migrate()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> Result<DbConn, r2d2::Error> {
        self.pool.get()
    }

    fn migrate(&self) -> DbResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                note_text  TEXT NOT NULL,
                note_html  TEXT NOT NULL DEFAULT '',
                summary    TEXT NOT NULL DEFAULT '',
                tags       TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_notes_user_created
                ON notes (user_id, created_at DESC);

            CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
                note_id UNINDEXED,
                note_text,
                summary,
                tokenize='porter'
            );",
        )?;

        Ok(())
    }
}
