//! Exclusion-rule repository.
//!
//! Rules live in the `exclusions` table with a UNIQUE(rule_type, rule_value)
//! constraint; inserts use `INSERT OR IGNORE` so seeding and re-seeding never
//! duplicate rows.

use chronicle_core::{ExclusionRule, RuleKind};
use rusqlite::{params, Connection};

use crate::errors::Result;

/// Exclusion repository — stateless, every method takes `&Connection`.
pub struct ExclusionRepo;

impl ExclusionRepo {
    /// Insert a rule if no identical (kind, value) pair exists.
    /// Returns whether a row was actually inserted.
    pub fn insert_or_ignore(conn: &Connection, rule: &ExclusionRule) -> Result<bool> {
        let changed = conn.execute(
            "INSERT OR IGNORE INTO exclusions (rule_type, rule_value, reason, is_default)
             VALUES (?1, ?2, ?3, ?4)",
            params![rule.kind.as_str(), rule.value, rule.reason, rule.is_default],
        )?;
        Ok(changed > 0)
    }

    /// Load every stored rule.
    pub fn load_all(conn: &Connection) -> Result<Vec<ExclusionRule>> {
        let mut stmt = conn.prepare(
            "SELECT rule_type, rule_value, reason, is_default FROM exclusions ORDER BY id",
        )?;
        let rules = stmt
            .query_map([], |row| {
                let kind_str: String = row.get(0)?;
                Ok(ExclusionRule {
                    kind: kind_str.parse::<RuleKind>().unwrap_or(RuleKind::Domain),
                    value: row.get(1)?,
                    reason: row.get(2)?,
                    is_default: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    /// Total rule rows.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM exclusions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count of default-seeded rule rows.
    pub fn count_defaults(conn: &Connection) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM exclusions WHERE is_default = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
