//! Row mapping and canonical timestamp handling.
//!
//! Timestamps are stored as RFC 3339 UTC text with second precision
//! ("2026-01-02T15:04:05Z") so that SQL range comparisons are plain
//! lexicographic string comparisons. The read side tolerates a small set of
//! legacy variants written by earlier versions.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chronicle_core::{Event, Source};
use rusqlite::Row;

/// Column list shared by every event SELECT, in [`event_from_row`] order.
pub const EVENT_COLUMNS: &str =
    "id, ts, url, title, domain, browser, source, has_body, has_embedding, content_hash";

/// Format a timestamp in the canonical stored form.
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse a stored timestamp, tolerating legacy formats.
pub fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    // Legacy rows: naive datetimes written without a zone marker are UTC.
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Map an event row selected with [`EVENT_COLUMNS`].
pub fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let ts_str: String = row.get(1)?;
    let source_str: String = row.get(6)?;
    Ok(Event {
        id: Some(row.get(0)?),
        url: row.get(2)?,
        title: row.get(3)?,
        domain: row.get(4)?,
        browser: row.get(5)?,
        source: source_str.parse::<Source>().unwrap_or_default(),
        timestamp: parse_ts(&ts_str),
        has_body: row.get(7)?,
        has_embedding: row.get(8)?,
        content_hash: row.get(9)?,
    })
}
