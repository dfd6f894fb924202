//! Audit repository — append-only record of destructive operations.

use rusqlite::{params, Connection};

use crate::errors::Result;

/// Audit repository — stateless, every method takes `&Connection`.
pub struct AuditRepo;

impl AuditRepo {
    /// Append an audit record. `ts` defaults in the schema.
    pub fn record(
        conn: &Connection,
        action: &str,
        detail: &str,
        event_id: Option<&str>,
    ) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO audit_log (action, detail, event_id) VALUES (?1, ?2, ?3)",
            params![action, detail, event_id],
        )?;
        Ok(())
    }

    /// Count records for an action, mostly for tests and status output.
    pub fn count_action(conn: &Connection, action: &str) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM audit_log WHERE action = ?1",
            params![action],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;

    #[test]
    fn record_and_count() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        AuditRepo::record(&conn, "prune", "removed 3 events", None).unwrap();
        AuditRepo::record(&conn, "delete", "", Some("evt_1")).unwrap();

        assert_eq!(AuditRepo::count_action(&conn, "prune").unwrap(), 1);
        assert_eq!(AuditRepo::count_action(&conn, "delete").unwrap(), 1);
        assert_eq!(AuditRepo::count_action(&conn, "purge").unwrap(), 0);
    }
}
