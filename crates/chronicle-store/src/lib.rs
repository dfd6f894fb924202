//! # chronicle-store
//!
//! SQLite storage and retrieval engine for Chronicle.
//!
//! The crate is layered the same way on disk as at runtime:
//!
//! - [`sqlite::connection`] — r2d2 connection pool with WAL + foreign keys
//!   enforced on every checkout
//! - [`sqlite::migrations`] — versioned, idempotent schema migrations and
//!   the curated default exclusion seed
//! - [`sqlite::repositories`] — stateless per-table data access
//!   (`EventRepo`, `ContentRepo`, `SearchRepo`, `ExclusionRepo`, `AuditRepo`)
//! - [`exclusions`] — in-memory snapshot of the privacy denylist, built once
//!   per store instance
//! - [`store`] — the high-level transactional [`EventStore`] API that the
//!   CLI and daemon call into
//!
//! Writes that span multiple statements (event + content + index) run inside
//! a single transaction; the full-text index is kept in lockstep with the
//! events table so index entries never outlive their source row.

#![deny(unsafe_code)]

pub mod errors;
pub mod exclusions;
pub mod sqlite;
pub mod store;

pub use errors::{Result, StoreError};
pub use exclusions::ExclusionList;
pub use store::event_store::{extract_domain, EventStore};
