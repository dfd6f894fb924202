//! Shared command context: settings resolution and store opening.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chronicle_core::ExclusionRule;
use chronicle_settings::{database_path, ChronicleSettings};
use chronicle_store::EventStore;
use tracing::debug;

/// Resolved runtime context handed to every command.
pub struct CliContext {
    pub settings: ChronicleSettings,
    pub db_path: PathBuf,
    /// Emit machine-readable JSON instead of human output.
    pub json: bool,
}

impl CliContext {
    pub fn new(settings: ChronicleSettings, db_override: Option<PathBuf>, json: bool) -> Self {
        let db_path = db_override.unwrap_or_else(|| database_path(&settings));
        Self {
            settings,
            db_path,
            json,
        }
    }

    /// Open the store, then fold any extra denylist entries from settings
    /// into the exclusion table. The snapshot is reloaded once if anything
    /// was inserted, so additions apply to this process immediately.
    pub fn open_store(&self) -> Result<EventStore> {
        let mut store = EventStore::open(&self.db_path)
            .with_context(|| format!("failed to open database at {}", self.db_path.display()))?;

        let mut inserted = false;
        for domain in &self.settings.capture.denylist_domains {
            inserted |= store.add_exclusion_rule(&ExclusionRule::domain(domain, "user settings"))?;
        }
        for pattern in &self.settings.capture.denylist_patterns {
            inserted |= store.add_exclusion_rule(&ExclusionRule::regex(pattern, "user settings"))?;
        }
        if inserted {
            debug!("settings denylist entries added, reloading exclusions");
            store.reload_exclusions()?;
        }
        Ok(store)
    }
}
