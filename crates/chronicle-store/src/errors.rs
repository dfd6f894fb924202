//! Error taxonomy for the storage engine.
//!
//! `NotFound` variants are part of the API contract and surfaced to callers
//! as-is. Everything else wraps an underlying engine failure with enough
//! context (operation, identifier, migration version) to diagnose. The store
//! never retries internally; transient-contention retries are a caller
//! concern.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage engine errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No event row matches the requested id.
    #[error("event {0} not found")]
    EventNotFound(String),

    /// The event may exist, but no content row does.
    #[error("content for event {0} not found")]
    ContentNotFound(String),

    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool failure.
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    /// A schema migration failed and was rolled back. Fatal to store
    /// initialization: operating against a partially-migrated schema is
    /// unsafe.
    #[error("migration {version} ({name}): {message}")]
    Migration {
        /// Migration version that failed.
        version: i64,
        /// Migration name.
        name: String,
        /// Underlying cause.
        message: String,
    },

    /// Filesystem failure while opening the database.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether this error is one of the `NotFound` contract variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::EventNotFound(_) | StoreError::ContentNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(StoreError::EventNotFound("evt_x".into()).is_not_found());
        assert!(StoreError::ContentNotFound("evt_x".into()).is_not_found());
        assert!(!StoreError::Migration {
            version: 1,
            name: "initial_schema".into(),
            message: "boom".into(),
        }
        .is_not_found());
    }

    #[test]
    fn messages_carry_identifiers() {
        let err = StoreError::EventNotFound("evt_abc".into());
        assert_eq!(err.to_string(), "event evt_abc not found");

        let err = StoreError::ContentNotFound("evt_abc".into());
        assert!(err.to_string().contains("content for event evt_abc"));
    }
}
