//! Search repository — FTS5 full-text search over events, plus the plain
//! filtered scan used when no free-text term is given.
//!
//! The `events_fts` table is a shadow of `events` (title, url, body) kept in
//! lockstep by the store: every event insert/delete mirrors into the index
//! inside the same logical operation. Entries must never outlive their
//! source row.

use std::fmt::Write;

use chronicle_core::{Event, SearchQuery};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Result;
use crate::sqlite::migrations::FTS_SCHEMA;
use crate::sqlite::row::{event_from_row, format_ts};

/// Event columns qualified for the FTS join.
const EVENT_COLUMNS_E: &str = "e.id, e.ts, e.url, e.title, e.domain, e.browser, e.source, \
     e.has_body, e.has_embedding, e.content_hash";

/// Search repository — stateless, every method takes `&Connection`.
pub struct SearchRepo;

impl SearchRepo {
    /// Run a search. Non-empty free-text goes through the FTS index ranked
    /// by relevance; otherwise a filtered scan ordered most-recent-first.
    /// Always returns a (possibly empty) vector.
    pub fn search(conn: &Connection, query: &SearchQuery) -> Result<Vec<Event>> {
        if query.text.trim().is_empty() {
            Self::search_filtered(conn, query)
        } else {
            Self::search_fts(conn, query)
        }
    }

    fn search_fts(conn: &Connection, query: &SearchQuery) -> Result<Vec<Event>> {
        let mut sql = format!(
            "SELECT {EVENT_COLUMNS_E}
             FROM events_fts
             JOIN events e ON e.id = events_fts.event_id
             WHERE events_fts MATCH ?1"
        );
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        values.push(Box::new(fts_match_expr(&query.text)));

        push_filters(&mut sql, &mut values, query, "e.");

        sql.push_str(" ORDER BY rank");
        let _ = write!(
            sql,
            " LIMIT {} OFFSET {}",
            query.effective_limit(),
            query.effective_offset()
        );

        Self::run(conn, &sql, &values)
    }

    fn search_filtered(conn: &Connection, query: &SearchQuery) -> Result<Vec<Event>> {
        let mut sql = format!(
            "SELECT {} FROM events WHERE 1=1",
            crate::sqlite::row::EVENT_COLUMNS
        );
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        push_filters(&mut sql, &mut values, query, "");

        sql.push_str(" ORDER BY ts DESC");
        let _ = write!(
            sql,
            " LIMIT {} OFFSET {}",
            query.effective_limit(),
            query.effective_offset()
        );

        Self::run(conn, &sql, &values)
    }

    fn run(
        conn: &Connection,
        sql: &str,
        values: &[Box<dyn rusqlite::types::ToSql>],
    ) -> Result<Vec<Event>> {
        let mut stmt = conn.prepare(sql)?;
        let refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(Box::as_ref).collect();
        let rows = stmt
            .query_map(refs.as_slice(), event_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Mirror an event into the index. `body` is empty when no content is
    /// attached.
    pub fn index(conn: &Connection, event_id: &str, title: &str, url: &str, body: &str) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO events_fts (event_id, title, url, body) VALUES (?1, ?2, ?3, ?4)",
            params![event_id, title, url, body],
        )?;
        Ok(())
    }

    /// Remove an event's index entry. Returns whether one existed.
    pub fn remove(conn: &Connection, event_id: &str) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM events_fts WHERE event_id = ?1",
            params![event_id],
        )?;
        Ok(changed > 0)
    }

    /// Remove index entries for every event strictly before `cutoff`.
    pub fn remove_before(conn: &Connection, cutoff: &str) -> Result<usize> {
        let changed = conn.execute(
            "DELETE FROM events_fts WHERE event_id IN (SELECT id FROM events WHERE ts < ?1)",
            params![cutoff],
        )?;
        Ok(changed)
    }

    /// Drop and recreate the index, leaving it empty (full purge).
    pub fn reset(conn: &Connection) -> Result<()> {
        conn.execute_batch("DROP TABLE IF EXISTS events_fts;")?;
        conn.execute_batch(FTS_SCHEMA)?;
        Ok(())
    }

    /// Whether an event has an index entry.
    pub fn is_indexed(conn: &Connection, event_id: &str) -> Result<bool> {
        let found: Option<String> = conn
            .query_row(
                "SELECT event_id FROM events_fts WHERE event_id = ?1",
                params![event_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

/// Append the structured filters shared by both search paths.
fn push_filters(
    sql: &mut String,
    values: &mut Vec<Box<dyn rusqlite::types::ToSql>>,
    query: &SearchQuery,
    prefix: &str,
) {
    if let Some(ref domain) = query.domain {
        let _ = write!(sql, " AND {prefix}domain = ?{}", values.len() + 1);
        values.push(Box::new(domain.clone()));
    }
    if let Some(ref browser) = query.browser {
        let _ = write!(sql, " AND {prefix}browser = ?{}", values.len() + 1);
        values.push(Box::new(browser.clone()));
    }
    if let Some(source) = query.source {
        let _ = write!(sql, " AND {prefix}source = ?{}", values.len() + 1);
        values.push(Box::new(source.as_str().to_string()));
    }
    if let Some(since) = query.since {
        let _ = write!(sql, " AND {prefix}ts >= ?{}", values.len() + 1);
        values.push(Box::new(format_ts(since)));
    }
    if let Some(until) = query.until {
        let _ = write!(sql, " AND {prefix}ts <= ?{}", values.len() + 1);
        values.push(Box::new(format_ts(until)));
    }
    if let Some(has_body) = query.has_body {
        let _ = write!(sql, " AND {prefix}has_body = ?{}", values.len() + 1);
        values.push(Box::new(has_body));
    }
    if let Some(has_embedding) = query.has_embedding {
        let _ = write!(sql, " AND {prefix}has_embedding = ?{}", values.len() + 1);
        values.push(Box::new(has_embedding));
    }
}

/// Convert a free-text term into an FTS5 MATCH expression: each whitespace
/// token becomes a quoted prefix match, OR-joined. Embedded quotes are
/// doubled per FTS5 string syntax.
pub(crate) fn fts_match_expr(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| format!("\"{}\"*", word.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;
    use crate::sqlite::repositories::event::EventRepo;
    use chrono::{DateTime, Duration, Utc};
    use chronicle_core::Source;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn add(conn: &Connection, id: &str, title: &str, url: &str, ts: DateTime<Utc>) {
        let domain = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        let event = Event {
            id: Some(id.to_string()),
            url: url.to_string(),
            title: title.to_string(),
            domain,
            timestamp: Some(ts),
            source: Source::Manual,
            browser: "firefox".into(),
            ..Default::default()
        };
        EventRepo::insert(conn, &event).unwrap();
        SearchRepo::index(conn, id, title, url, "").unwrap();
    }

    #[test]
    fn match_expr_prefix_tokens() {
        assert_eq!(fts_match_expr("rust"), "\"rust\"*");
        assert_eq!(fts_match_expr("rust lang"), "\"rust\"* OR \"lang\"*");
        assert_eq!(fts_match_expr("  spaced   out  "), "\"spaced\"* OR \"out\"*");
        assert_eq!(fts_match_expr("say \"hi\""), "\"say\"* OR \"\"\"hi\"\"\"*");
        assert_eq!(fts_match_expr(""), "");
    }

    #[test]
    fn fts_title_prefix_match() {
        let conn = setup();
        let now = Utc::now();
        add(&conn, "evt_1", "Rust Programming Language", "https://rust-lang.org", now);
        add(&conn, "evt_2", "Python Tutorial", "https://python.org", now);

        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                text: "Progr".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id.as_deref(), Some("evt_1"));
    }

    #[test]
    fn fts_url_match() {
        let conn = setup();
        add(&conn, "evt_1", "Docs", "https://docs.example.com/guide", Utc::now());

        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                text: "guide".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn fts_body_match_when_indexed() {
        let conn = setup();
        let event = Event {
            id: Some("evt_1".into()),
            url: "https://a.com/x".into(),
            title: "Untitled".into(),
            domain: "a.com".into(),
            timestamp: Some(Utc::now()),
            has_body: true,
            ..Default::default()
        };
        EventRepo::insert(&conn, &event).unwrap();
        SearchRepo::index(&conn, "evt_1", "Untitled", "https://a.com/x", "zanzibar ferries").unwrap();

        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                text: "zanzibar".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn fts_applies_structured_filters() {
        let conn = setup();
        let now = Utc::now();
        add(&conn, "evt_1", "Kernel notes", "https://a.com/1", now);
        add(&conn, "evt_2", "Kernel docs", "https://b.com/2", now);

        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                text: "kernel".into(),
                domain: Some("b.com".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].domain, "b.com");
    }

    #[test]
    fn filtered_scan_recency_order() {
        let conn = setup();
        let now = Utc::now();
        add(&conn, "evt_old", "Old", "https://a.com/old", now - Duration::hours(2));
        add(&conn, "evt_mid", "Mid", "https://a.com/mid", now - Duration::hours(1));
        add(&conn, "evt_new", "New", "https://a.com/new", now);
        add(&conn, "evt_other", "Other", "https://b.com/x", now);

        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                domain: Some("a.com".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let ids: Vec<_> = results.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["evt_new", "evt_mid", "evt_old"]);
    }

    #[test]
    fn filtered_scan_time_window() {
        let conn = setup();
        let now = Utc::now();
        add(&conn, "evt_old", "Old", "https://a.com/1", now - Duration::hours(72));
        add(&conn, "evt_new", "New", "https://a.com/2", now);

        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                since: Some(now - Duration::hours(24)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id.as_deref(), Some("evt_new"));
    }

    #[test]
    fn limit_and_offset_page() {
        let conn = setup();
        let now = Utc::now();
        for i in 0..5 {
            add(
                &conn,
                &format!("evt_{i}"),
                "Page",
                &format!("https://a.com/{i}"),
                now - Duration::minutes(i),
            );
        }

        let page = SearchRepo::search(
            &conn,
            &SearchQuery {
                limit: 2,
                offset: 2,
                ..Default::default()
            },
        )
        .unwrap();
        let ids: Vec<_> = page.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["evt_2", "evt_3"]);
    }

    #[test]
    fn no_match_returns_empty_vec() {
        let conn = setup();
        let results = SearchRepo::search(
            &conn,
            &SearchQuery {
                text: "nothing".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn remove_and_reset() {
        let conn = setup();
        add(&conn, "evt_1", "Hello", "https://a.com", Utc::now());
        assert!(SearchRepo::is_indexed(&conn, "evt_1").unwrap());
        assert!(SearchRepo::remove(&conn, "evt_1").unwrap());
        assert!(!SearchRepo::remove(&conn, "evt_1").unwrap());

        add(&conn, "evt_2", "World", "https://a.com/2", Utc::now());
        SearchRepo::reset(&conn).unwrap();
        assert!(!SearchRepo::is_indexed(&conn, "evt_2").unwrap());
    }
}
