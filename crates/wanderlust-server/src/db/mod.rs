mod migrations;

use std::path::{Path, PathBuf};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Connections shared by page handlers, the JSON API and session checks.
const MAX_CONNECTIONS: u32 = 8;

const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
     PRAGMA foreign_keys = ON;
     PRAGMA busy_timeout = 5000;";

#[derive(Debug, thiserror::Error)]
pub enum DbInitError {
    #[error("cannot create database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot open database pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("cannot migrate trip store: {0}")]
    Migration(#[from] rusqlite::Error),
}

/// Opens the trip store at `sqlite_path`, creating missing directories and
/// bringing the schema up to date.
pub fn create_pool(sqlite_path: &str) -> Result<DbPool, DbInitError> {
    let parent = Path::new(sqlite_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        std::fs::create_dir_all(dir).map_err(|source| DbInitError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let manager = SqliteConnectionManager::file(sqlite_path)
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

    let pool = Pool::builder().max_size(MAX_CONNECTIONS).build(manager)?;
    migrations::run(&*pool.get()?)?;

    tracing::debug!("Trip store ready at {sqlite_path}");
    Ok(pool)
}
