//! In-memory snapshot of the privacy denylist.
//!
//! Rules are loaded once per store instance and the snapshot is immutable
//! afterwards, so lookups are lock-free and never touch the database. Rule
//! changes made while a store is open take effect when the snapshot is
//! rebuilt (store reopen or an explicit reload), a documented limitation
//! rather than a bug.

use std::collections::HashSet;

use chronicle_core::{ExclusionRule, RuleKind};
use regex::Regex;
use rusqlite::Connection;
use tracing::warn;

use crate::errors::Result;
use crate::sqlite::repositories::exclusion::ExclusionRepo;

/// Immutable denylist snapshot: exact-match domains plus compiled patterns.
pub struct ExclusionList {
    domains: HashSet<String>,
    patterns: Vec<Regex>,
}

impl ExclusionList {
    /// Build a snapshot from the rules currently stored in the database.
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self::from_rules(&ExclusionRepo::load_all(conn)?))
    }

    /// Build a snapshot from an explicit rule list.
    ///
    /// Invalid stored patterns are skipped with a warning instead of
    /// aborting: a bad rule must not brick the store.
    pub fn from_rules(rules: &[ExclusionRule]) -> Self {
        let mut domains = HashSet::new();
        let mut patterns = Vec::new();

        for rule in rules {
            match rule.kind {
                RuleKind::Domain => {
                    let _ = domains.insert(rule.value.clone());
                }
                RuleKind::Regex => match Regex::new(&rule.value) {
                    Ok(re) => patterns.push(re),
                    Err(e) => {
                        warn!(pattern = %rule.value, error = %e, "skipping invalid exclusion pattern");
                    }
                },
            }
        }

        Self { domains, patterns }
    }

    /// Whether a domain is blocked by any rule. Pure in-memory check.
    pub fn is_excluded(&self, domain: &str) -> bool {
        if domain.is_empty() {
            return false;
        }
        self.domains.contains(domain) || self.patterns.iter().any(|re| re.is_match(domain))
    }

    /// Number of loaded rules (valid patterns only).
    pub fn len(&self) -> usize {
        self.domains.len() + self.patterns.len()
    }

    /// True when no rules are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
