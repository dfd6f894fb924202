//! Connection pooling.
//!
//! Every connection handed out by the pool has WAL journaling, foreign key
//! enforcement, and a busy timeout applied at checkout, so readers never
//! block on a concurrent writer and cascading deletes are always enforced.
//! Disabling foreign keys is not a supported configuration.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use uuid::Uuid;

use crate::errors::Result;

/// Pool over SQLite connections.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// A checked-out pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pragmas applied to every pooled connection.
const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
";

/// Open a pool over a database file, creating parent directories as needed.
pub fn open_pool(path: &Path) -> Result<ConnectionPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch(PRAGMAS));
    let pool = Pool::builder().max_size(8).build(manager)?;
    Ok(pool)
}

/// Open a pool over a private in-memory database.
///
/// Uses a uniquely named shared-cache URI so that every connection in the
/// pool sees the same database. The database lives as long as the pool keeps
/// at least one connection open.
pub fn open_in_memory_pool() -> Result<ConnectionPool> {
    let uri = format!(
        "file:chronicle-mem-{}?mode=memory&cache=shared",
        Uuid::new_v4().simple()
    );
    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch(PRAGMAS));
    let pool = Pool::builder().max_size(4).build(manager)?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_enabled_on_checkout() {
        let pool = open_in_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn pooled_connections_share_one_database() {
        let pool = open_in_memory_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")
                .unwrap();
        }
        let conn = pool.get().unwrap();
        let x: i64 = conn.query_row("SELECT x FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(x, 7);
    }

    #[test]
    fn separate_memory_pools_are_isolated() {
        let a = open_in_memory_pool().unwrap();
        let b = open_in_memory_pool().unwrap();
        a.get()
            .unwrap()
            .execute_batch("CREATE TABLE only_in_a (x INTEGER);")
            .unwrap();
        let err = b
            .get()
            .unwrap()
            .query_row("SELECT x FROM only_in_a", [], |row| row.get::<_, i64>(0));
        assert!(err.is_err());
    }

    #[test]
    fn file_pool_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/chronicle.db");
        let pool = open_pool(&path).unwrap();
        let conn = pool.get().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
        assert!(path.exists());
    }
}
