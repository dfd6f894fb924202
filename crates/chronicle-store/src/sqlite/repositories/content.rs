//! Content repository — body text attached one-to-one to events.
//!
//! Rows cascade-delete with their owning event; this repo never deletes
//! content directly except during a full purge.

use chronicle_core::Content;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Result;

/// Default stored format tag.
pub const DEFAULT_FORMAT: &str = "md";

/// Content repository — stateless, every method takes `&Connection`.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert body text for an event. Byte size is computed here so the
    /// stored metadata always matches the stored body.
    pub fn insert(conn: &Connection, event_id: &str, body: &str, format: &str) -> Result<()> {
        let byte_size = body.len() as i64;
        let _ = conn.execute(
            "INSERT INTO content (event_id, format, body, byte_size) VALUES (?1, ?2, ?3, ?4)",
            params![event_id, format, body, byte_size],
        )?;
        Ok(())
    }

    /// Get content for an event.
    pub fn get(conn: &Connection, event_id: &str) -> Result<Option<Content>> {
        let content = conn
            .query_row(
                "SELECT event_id, body, format, byte_size FROM content WHERE event_id = ?1",
                params![event_id],
                |row| {
                    Ok(Content {
                        event_id: row.get(0)?,
                        body: row.get(1)?,
                        format: row.get(2)?,
                        byte_size: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(content)
    }

    /// Total content rows.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM content", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete every content row (full purge only).
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        let changed = conn.execute("DELETE FROM content", [])?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO events (id, ts, url, title, domain) VALUES
             ('evt_1', '2026-01-01T00:00:00Z', 'https://a.com', 'A', 'a.com')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn insert_and_get_with_byte_size() {
        let conn = setup();
        ContentRepo::insert(&conn, "evt_1", "héllo body", DEFAULT_FORMAT).unwrap();

        let content = ContentRepo::get(&conn, "evt_1").unwrap().unwrap();
        assert_eq!(content.event_id, "evt_1");
        assert_eq!(content.body, "héllo body");
        assert_eq!(content.format, "md");
        assert_eq!(content.byte_size, "héllo body".len() as i64);
    }

    #[test]
    fn get_missing_is_none() {
        let conn = setup();
        assert!(ContentRepo::get(&conn, "evt_1").unwrap().is_none());
        assert!(ContentRepo::get(&conn, "evt_missing").unwrap().is_none());
    }

    #[test]
    fn cascade_delete_with_event() {
        let conn = setup();
        ContentRepo::insert(&conn, "evt_1", "body", DEFAULT_FORMAT).unwrap();
        assert_eq!(ContentRepo::count(&conn).unwrap(), 1);

        conn.execute("DELETE FROM events WHERE id = 'evt_1'", [])
            .unwrap();
        assert_eq!(ContentRepo::count(&conn).unwrap(), 0);
    }

    #[test]
    fn orphan_content_rejected() {
        let conn = setup();
        let err = ContentRepo::insert(&conn, "evt_missing", "body", DEFAULT_FORMAT);
        assert!(err.is_err(), "foreign key should reject orphan content");
    }
}
