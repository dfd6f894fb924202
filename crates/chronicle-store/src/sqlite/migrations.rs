//! Versioned, idempotent schema migrations.
//!
//! Each migration runs inside a single transaction and records its version
//! in `schema_migrations` within that same transaction; a failure rolls the
//! whole step back and leaves the database at its prior consistent state, so
//! a later call retries the same migration. Versions are applied in strictly
//! increasing order and never twice.

use chronicle_core::ExclusionRule;
use rusqlite::{params, Connection, Transaction};
use tracing::info;

use crate::errors::{Result, StoreError};
use crate::sqlite::repositories::exclusion::ExclusionRepo;

/// One schema change, keyed by version.
struct Migration {
    version: i64,
    name: &'static str,
    apply: fn(&Transaction<'_>) -> Result<()>,
}

/// All known migrations, in version order.
static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    apply: migrate_v001,
}];

/// Bring the database to the latest known schema version.
///
/// Safe to run against an already-migrated database: applied versions are
/// skipped after a version check.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for migration in MIGRATIONS {
        if is_applied(conn, migration.version)? {
            continue;
        }
        apply(conn, migration).map_err(|e| StoreError::Migration {
            version: migration.version,
            name: migration.name.to_string(),
            message: e.to_string(),
        })?;
        info!(version = migration.version, name = migration.name, "applied migration");
    }

    Ok(())
}

fn is_applied(conn: &Connection, version: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM schema_migrations WHERE version = ?1",
        params![version],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn.transaction()?;
    (migration.apply)(&tx)?;
    let _ = tx.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
        params![migration.version, migration.name],
    )?;
    tx.commit()?;
    Ok(())
}

/// The FTS5 shadow index over event title/url/body. Kept as its own constant
/// so a full purge can drop and recreate it.
pub(crate) const FTS_SCHEMA: &str = "
CREATE VIRTUAL TABLE IF NOT EXISTS events_fts USING fts5(
    event_id UNINDEXED,
    title,
    url,
    body,
    tokenize='unicode61'
);";

/// v1: every table, index, and the curated default exclusion rules.
const SCHEMA_V001: &str = "
CREATE TABLE IF NOT EXISTS events (
    id            TEXT PRIMARY KEY,
    ts            TEXT NOT NULL DEFAULT (datetime('now')),
    url           TEXT NOT NULL,
    title         TEXT NOT NULL DEFAULT '',
    domain        TEXT NOT NULL DEFAULT '',
    browser       TEXT NOT NULL DEFAULT '',
    source        TEXT NOT NULL DEFAULT 'extension'
        CHECK(source IN ('extension', 'manual', 'import')),
    has_body      INTEGER NOT NULL DEFAULT 0,
    has_embedding INTEGER NOT NULL DEFAULT 0,
    content_hash  TEXT,
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS content (
    event_id   TEXT PRIMARY KEY REFERENCES events(id) ON DELETE CASCADE,
    format     TEXT NOT NULL DEFAULT 'md',
    body       TEXT NOT NULL,
    byte_size  INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS exclusions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    rule_type  TEXT NOT NULL CHECK (rule_type IN ('domain', 'regex')),
    rule_value TEXT NOT NULL,
    reason     TEXT NOT NULL DEFAULT '',
    is_default INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(rule_type, rule_value)
);

CREATE TABLE IF NOT EXISTS config (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS embedding_metadata (
    event_id      TEXT PRIMARY KEY REFERENCES events(id) ON DELETE CASCADE,
    model_name    TEXT NOT NULL,
    model_version TEXT NOT NULL DEFAULT '',
    dimensions    INTEGER NOT NULL,
    embedded_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS audit_log (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    action   TEXT NOT NULL,
    detail   TEXT NOT NULL DEFAULT '',
    event_id TEXT,
    ts       TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_events_ts           ON events(ts);
CREATE INDEX IF NOT EXISTS idx_events_domain       ON events(domain);
CREATE INDEX IF NOT EXISTS idx_events_browser      ON events(browser);
CREATE INDEX IF NOT EXISTS idx_events_source       ON events(source);
CREATE INDEX IF NOT EXISTS idx_events_content_hash ON events(content_hash);
CREATE INDEX IF NOT EXISTS idx_events_ts_domain    ON events(ts, domain);
CREATE INDEX IF NOT EXISTS idx_events_flags        ON events(has_body, has_embedding);
CREATE INDEX IF NOT EXISTS idx_exclusions_rule     ON exclusions(rule_type, rule_value);
CREATE INDEX IF NOT EXISTS idx_audit_log_ts        ON audit_log(ts);
CREATE INDEX IF NOT EXISTS idx_audit_log_action    ON audit_log(action);
";

fn migrate_v001(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(SCHEMA_V001)?;
    tx.execute_batch(FTS_SCHEMA)?;
    seed_default_exclusions(tx)?;
    Ok(())
}

fn seed_default_exclusions(tx: &Transaction<'_>) -> Result<()> {
    for rule in default_rules() {
        let _ = ExclusionRepo::insert_or_ignore(tx, &rule)?;
    }
    Ok(())
}

/// The curated default denylist: banking, password managers, identity
/// providers, healthcare, tax/government, and adult content via pattern.
/// Seeded with insert-if-absent so re-running never duplicates rows.
pub fn default_rules() -> Vec<ExclusionRule> {
    let domain = |value: &str, reason: &str| ExclusionRule {
        is_default: true,
        ..ExclusionRule::domain(value, reason)
    };
    let regex = |value: &str, reason: &str| ExclusionRule {
        is_default: true,
        ..ExclusionRule::regex(value, reason)
    };

    vec![
        // Banking & financial
        domain("chase.com", "Banking - financial privacy"),
        domain("bankofamerica.com", "Banking - financial privacy"),
        domain("wellsfargo.com", "Banking - financial privacy"),
        domain("citi.com", "Banking - financial privacy"),
        domain("capitalone.com", "Banking - financial privacy"),
        domain("usbank.com", "Banking - financial privacy"),
        domain("schwab.com", "Banking - financial privacy"),
        domain("fidelity.com", "Banking - financial privacy"),
        domain("vanguard.com", "Banking - financial privacy"),
        domain("paypal.com", "Payment - financial privacy"),
        domain("venmo.com", "Payment - financial privacy"),
        // Password managers
        domain("1password.com", "Password manager - credential privacy"),
        domain("bitwarden.com", "Password manager - credential privacy"),
        domain("lastpass.com", "Password manager - credential privacy"),
        domain("dashlane.com", "Password manager - credential privacy"),
        // Auth providers
        domain("accounts.google.com", "Auth provider - credential privacy"),
        domain("login.microsoftonline.com", "Auth provider - credential privacy"),
        domain("auth0.com", "Auth provider - credential privacy"),
        domain("okta.com", "Auth provider - credential privacy"),
        // Healthcare
        domain("mychart.com", "Healthcare - HIPAA privacy"),
        domain("patient.myuhc.com", "Healthcare - HIPAA privacy"),
        // Tax / government
        domain("irs.gov", "Tax - financial privacy"),
        domain("turbotax.intuit.com", "Tax - financial privacy"),
        // Adult content (patterns)
        regex(r".*\.xxx$", "Adult content exclusion"),
        regex(r".*pornhub\.com$", "Adult content exclusion"),
    ]
}
