//! High-level transactional `EventStore` API.
//!
//! Composes the repositories into the operations the CLI and daemon call.
//! Opening a store runs migrations and loads the exclusion snapshot; every
//! multi-statement write runs inside a single transaction so callers never
//! observe partial state. The store is a synchronous library: no internal
//! threading, no internal retries.

use std::path::Path;

use chrono::{DateTime, Utc};
use chronicle_core::{Content, Event, ExclusionRule, SearchQuery, Stats};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{Result, StoreError};
use crate::exclusions::ExclusionList;
use crate::sqlite::connection::{self, ConnectionPool, PooledConnection};
use crate::sqlite::migrations::run_migrations;
use crate::sqlite::repositories::audit::AuditRepo;
use crate::sqlite::repositories::content::{ContentRepo, DEFAULT_FORMAT};
use crate::sqlite::repositories::event::EventRepo;
use crate::sqlite::repositories::exclusion::ExclusionRepo;
use crate::sqlite::repositories::search::SearchRepo;
use crate::sqlite::row::{format_ts, parse_ts};

/// Extract the host component of a URL. Unparsable input yields an empty
/// string; strict URL validation belongs to the caller (e.g. the CLI).
pub fn extract_domain(raw_url: &str) -> String {
    url::Url::parse(raw_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Generate an event id: fixed prefix plus a random suffix.
fn generate_id() -> String {
    format!("evt_{}", Uuid::new_v4().simple())
}

/// The Chronicle event store.
///
/// Holds a connection pool (WAL, foreign keys enforced) and the immutable
/// exclusion snapshot loaded at construction. Dropping the store releases
/// the pooled connections; there is no separate close step.
pub struct EventStore {
    pool: ConnectionPool,
    exclusions: ExclusionList,
}

impl EventStore {
    /// Open (creating if necessary) and migrate a database file, then load
    /// the exclusion snapshot.
    pub fn open(path: &Path) -> Result<Self> {
        let pool = connection::open_pool(path)?;
        let store = Self::from_pool(pool)?;
        info!(path = %path.display(), rules = store.exclusions.len(), "store opened");
        Ok(store)
    }

    /// Open a private in-memory store (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_pool(connection::open_in_memory_pool()?)
    }

    fn from_pool(pool: ConnectionPool) -> Result<Self> {
        let exclusions = {
            let mut conn = pool.get()?;
            run_migrations(&mut conn)?;
            ExclusionList::load(&conn)?
        };
        Ok(Self { pool, exclusions })
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// The current exclusion snapshot.
    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    /// Insert a rule if absent. Takes effect for this store instance only
    /// after [`EventStore::reload_exclusions`].
    pub fn add_exclusion_rule(&self, rule: &ExclusionRule) -> Result<bool> {
        let conn = self.conn()?;
        ExclusionRepo::insert_or_ignore(&conn, rule)
    }

    /// Rebuild the exclusion snapshot from the database. The snapshot is
    /// replaced wholesale rather than mutated in place.
    pub fn reload_exclusions(&mut self) -> Result<()> {
        let conn = self.conn()?;
        self.exclusions = ExclusionList::load(&conn)?;
        Ok(())
    }

    /// Record a browsing event.
    ///
    /// The domain is derived from the URL's host; the id and timestamp are
    /// assigned here. When the domain is excluded the call succeeds without
    /// writing and leaves `event.id` as `None` — the silent-skip policy for
    /// passive capture paths. Callers wanting an explicit error must check
    /// [`EventStore::exclusions`] themselves.
    pub fn add_event(&self, event: &mut Event) -> Result<()> {
        self.prepare(event)?;
        if event.id.is_none() {
            return Ok(());
        }

        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        EventRepo::insert(&tx, event)?;
        SearchRepo::index(
            &tx,
            event.id.as_deref().unwrap_or_default(),
            &event.title,
            &event.url,
            "",
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Record a browsing event together with its body text.
    ///
    /// Event row, content row, and index entry are written in one
    /// transaction; the `has_body` flag and a SHA-256 content hash are set
    /// before the insert. Exclusion handling matches [`EventStore::add_event`].
    pub fn add_event_with_content(&self, event: &mut Event, body: &str) -> Result<()> {
        self.prepare(event)?;
        if event.id.is_none() {
            return Ok(());
        }
        event.has_body = true;
        if event.content_hash.is_none() {
            event.content_hash = Some(format!("{:x}", Sha256::digest(body.as_bytes())));
        }

        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let id = event.id.clone().unwrap_or_default();
        EventRepo::insert(&tx, event)?;
        ContentRepo::insert(&tx, &id, body, DEFAULT_FORMAT)?;
        SearchRepo::index(&tx, &id, &event.title, &event.url, body)?;
        tx.commit()?;
        Ok(())
    }

    /// Derive the domain, apply the exclusion policy, and assign id and
    /// timestamp. Leaves `event.id` as `None` for excluded domains.
    fn prepare(&self, event: &mut Event) -> Result<()> {
        event.domain = extract_domain(&event.url);
        event.id = None;

        if self.exclusions.is_excluded(&event.domain) {
            debug!(domain = %event.domain, "skipping excluded domain");
            return Ok(());
        }

        event.id = Some(generate_id());
        if event.timestamp.is_none() {
            event.timestamp = Some(Utc::now());
        }
        Ok(())
    }

    /// Fetch one event by id.
    pub fn get_event(&self, id: &str) -> Result<Event> {
        let conn = self.conn()?;
        EventRepo::get(&conn, id)?.ok_or_else(|| StoreError::EventNotFound(id.to_string()))
    }

    /// Fetch the stored body for an event. Fails with `ContentNotFound`
    /// when no content row exists, whether or not the event itself does.
    pub fn get_content(&self, id: &str) -> Result<Content> {
        let conn = self.conn()?;
        ContentRepo::get(&conn, id)?.ok_or_else(|| StoreError::ContentNotFound(id.to_string()))
    }

    /// Search events. Empty result is a success, never an error.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Event>> {
        let conn = self.conn()?;
        SearchRepo::search(&conn, query)
    }

    /// Delete one event: index entry and row in one transaction, content
    /// cascading via the foreign key.
    pub fn delete_event(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let _ = SearchRepo::remove(&tx, id)?;
        if !EventRepo::delete(&tx, id)? {
            return Err(StoreError::EventNotFound(id.to_string()));
        }
        AuditRepo::record(&tx, "delete", "", Some(id))?;
        tx.commit()?;
        Ok(())
    }

    /// Count events strictly older than `cutoff` without deleting anything.
    /// Lets a confirmation prompt be informed before [`EventStore::prune_expired`].
    pub fn count_expired(&self, cutoff: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn()?;
        EventRepo::count_before(&conn, &format_ts(cutoff))
    }

    /// Delete every event strictly older than `cutoff`, index entries
    /// first. Returns the number of events removed.
    pub fn prune_expired(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let cutoff_ts = format_ts(cutoff);
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let _ = SearchRepo::remove_before(&tx, &cutoff_ts)?;
        let removed = EventRepo::delete_before(&tx, &cutoff_ts)?;
        if removed > 0 {
            AuditRepo::record(&tx, "prune", &format!("removed {removed} events before {cutoff_ts}"), None)?;
        }
        tx.commit()?;
        info!(removed, cutoff = %cutoff_ts, "prune complete");
        Ok(removed)
    }

    /// Irreversibly delete all events and content and rebuild the index
    /// from scratch. Schema and exclusion rules stay intact.
    pub fn purge_all(&self) -> Result<()> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let _ = ContentRepo::delete_all(&tx)?;
        let removed = EventRepo::delete_all(&tx)?;
        SearchRepo::reset(&tx)?;
        AuditRepo::record(&tx, "purge", &format!("purged {removed} events"), None)?;
        tx.commit()?;
        info!(removed, "purge complete");
        Ok(())
    }

    /// Aggregate statistics for status output.
    pub fn stats(&self) -> Result<Stats> {
        let conn = self.conn()?;

        let total_events = EventRepo::count(&conn)?;
        let total_content = ContentRepo::count(&conn)?;
        let (oldest_event, newest_event) = match EventRepo::time_range(&conn)? {
            Some((min, max)) => (parse_ts(&min), parse_ts(&max)),
            None => (None, None),
        };

        let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
        let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

        Ok(Stats {
            total_events,
            total_content,
            oldest_event,
            newest_event,
            database_size_bytes: page_count * page_size,
            top_domains: EventRepo::top_domains(&conn, 10)?,
        })
    }
}
