//! Event repository — CRUD and aggregates over the `events` table.

use chronicle_core::{DomainCount, Event};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Result;
use crate::sqlite::row::{event_from_row, format_ts, EVENT_COLUMNS};

/// Event repository — stateless, every method takes `&Connection`.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event row. The event must already carry an id, a derived
    /// domain, and a timestamp.
    pub fn insert(conn: &Connection, event: &Event) -> Result<()> {
        let id = event.id.as_deref().unwrap_or_default();
        let ts = format_ts(event.timestamp.unwrap_or_default());
        let _ = conn.execute(
            "INSERT INTO events (id, ts, url, title, domain, browser, source, has_body, has_embedding, content_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                ts,
                event.url,
                event.title,
                event.domain,
                event.browser,
                event.source.as_str(),
                event.has_body,
                event.has_embedding,
                event.content_hash,
            ],
        )?;
        Ok(())
    }

    /// Get an event by id.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<Event>> {
        let event = conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![id],
                event_from_row,
            )
            .optional()?;
        Ok(event)
    }

    /// Delete an event by id. Returns whether a row was removed; content
    /// cascades via the foreign key.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Total event rows.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count events strictly before `cutoff` (canonical timestamp text).
    pub fn count_before(conn: &Connection, cutoff: &str) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM events WHERE ts < ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete events strictly before `cutoff`. Returns the number removed.
    pub fn delete_before(conn: &Connection, cutoff: &str) -> Result<usize> {
        let changed = conn.execute("DELETE FROM events WHERE ts < ?1", params![cutoff])?;
        Ok(changed)
    }

    /// Delete every event row.
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        let changed = conn.execute("DELETE FROM events", [])?;
        Ok(changed)
    }

    /// Oldest and newest stored timestamps, as canonical text.
    pub fn time_range(conn: &Connection) -> Result<Option<(String, String)>> {
        let range: Option<(Option<String>, Option<String>)> = conn
            .query_row("SELECT MIN(ts), MAX(ts) FROM events", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;
        Ok(match range {
            Some((Some(min), Some(max))) => Some((min, max)),
            _ => None,
        })
    }

    /// Top domains by event count, descending.
    pub fn top_domains(conn: &Connection, limit: i64) -> Result<Vec<DomainCount>> {
        let mut stmt = conn.prepare(
            "SELECT domain, COUNT(*) AS cnt FROM events
             GROUP BY domain ORDER BY cnt DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(DomainCount {
                    domain: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;
    use chrono::{Duration, Utc};
    use chronicle_core::Source;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn sample(id: &str, domain: &str) -> Event {
        Event {
            id: Some(id.to_string()),
            url: format!("https://{domain}/page"),
            title: "Title".into(),
            domain: domain.to_string(),
            timestamp: Some(Utc::now()),
            source: Source::Manual,
            browser: "firefox".into(),
            ..Default::default()
        }
    }

    #[test]
    fn insert_and_get() {
        let conn = setup();
        let event = sample("evt_1", "example.com");
        EventRepo::insert(&conn, &event).unwrap();

        let got = EventRepo::get(&conn, "evt_1").unwrap().unwrap();
        assert_eq!(got.id.as_deref(), Some("evt_1"));
        assert_eq!(got.url, "https://example.com/page");
        assert_eq!(got.domain, "example.com");
        assert_eq!(got.source, Source::Manual);
        assert!(got.timestamp.is_some());
    }

    #[test]
    fn get_missing_is_none() {
        let conn = setup();
        assert!(EventRepo::get(&conn, "evt_nope").unwrap().is_none());
    }

    #[test]
    fn delete_reports_rows_affected() {
        let conn = setup();
        EventRepo::insert(&conn, &sample("evt_1", "a.com")).unwrap();
        assert!(EventRepo::delete(&conn, "evt_1").unwrap());
        assert!(!EventRepo::delete(&conn, "evt_1").unwrap());
    }

    #[test]
    fn count_before_boundary_is_strict() {
        let conn = setup();
        let now = Utc::now();
        let mut old = sample("evt_old", "a.com");
        old.timestamp = Some(now - Duration::hours(72));
        let mut recent = sample("evt_new", "a.com");
        recent.timestamp = Some(now);
        EventRepo::insert(&conn, &old).unwrap();
        EventRepo::insert(&conn, &recent).unwrap();

        let cutoff = crate::sqlite::row::format_ts(now - Duration::hours(24));
        assert_eq!(EventRepo::count_before(&conn, &cutoff).unwrap(), 1);
        assert_eq!(EventRepo::delete_before(&conn, &cutoff).unwrap(), 1);
        assert_eq!(EventRepo::count(&conn).unwrap(), 1);
        assert!(EventRepo::get(&conn, "evt_new").unwrap().is_some());
    }

    #[test]
    fn top_domains_ordering() {
        let conn = setup();
        EventRepo::insert(&conn, &sample("evt_1", "a.com")).unwrap();
        EventRepo::insert(&conn, &sample("evt_2", "b.com")).unwrap();
        EventRepo::insert(&conn, &sample("evt_3", "a.com")).unwrap();

        let top = EventRepo::top_domains(&conn, 10).unwrap();
        assert_eq!(top[0].domain, "a.com");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[1].count, 1);
    }

    #[test]
    fn time_range_empty_and_filled() {
        let conn = setup();
        assert!(EventRepo::time_range(&conn).unwrap().is_none());

        EventRepo::insert(&conn, &sample("evt_1", "a.com")).unwrap();
        let (min, max) = EventRepo::time_range(&conn).unwrap().unwrap();
        assert!(min <= max);
    }
}
