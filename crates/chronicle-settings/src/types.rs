//! Settings type definitions.
//!
//! Every section carries `#[serde(default)]` so a partial settings file is
//! valid: missing fields take their compiled default. Field names are
//! snake_case in the JSON to match the keys users see in documentation.

use serde::{Deserialize, Serialize};

/// Root settings type for Chronicle.
///
/// Loaded from `~/.config/chronicle/settings.json` (see
/// [`crate::loader::load_settings`]) with defaults applied for missing
/// fields and `CHRONICLE_*` environment overrides on top.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronicleSettings {
    /// How long events are kept before pruning.
    pub retention: RetentionSettings,
    /// Capture policy additions (extra denylist entries).
    pub capture: CaptureSettings,
    /// Where the database lives.
    pub storage: StorageSettings,
    /// Capture daemon address, used by the status probe.
    pub daemon: DaemonSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for ChronicleSettings {
    fn default() -> Self {
        Self {
            retention: RetentionSettings::default(),
            capture: CaptureSettings::default(),
            storage: StorageSettings::default(),
            daemon: DaemonSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Retention policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// Events older than this many days are eligible for pruning.
    pub days: u32,
    /// How often the daemon runs the prune pass.
    pub prune_interval_hours: u32,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            days: 30,
            prune_interval_hours: 24,
        }
    }
}

/// User additions to the capture denylist. These are inserted into the
/// store's exclusion table at open; the curated defaults ship with the
/// database schema itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Extra exact-match domains to exclude.
    pub denylist_domains: Vec<String>,
    /// Extra regex patterns to exclude.
    pub denylist_patterns: Vec<String>,
}

/// Database location.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Data directory. A leading `~` is expanded to the home directory.
    pub dir: String,
    /// SQLite file name inside the data directory.
    pub sqlite_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: "~/.config/chronicle".to_string(),
            sqlite_file: "chronicle.db".to_string(),
        }
    }
}

/// Capture daemon address.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    pub host: String,
    pub port: u16,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8721,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default log filter, overridable with `CHRONICLE_LOG_LEVEL` / `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = ChronicleSettings::default();
        assert_eq!(s.retention.days, 30);
        assert_eq!(s.retention.prune_interval_hours, 24);
        assert_eq!(s.daemon.host, "127.0.0.1");
        assert_eq!(s.daemon.port, 8721);
        assert_eq!(s.storage.sqlite_file, "chronicle.db");
        assert_eq!(s.logging.level, "info");
        assert!(s.capture.denylist_domains.is_empty());
    }

    #[test]
    fn partial_json_fills_missing_fields() {
        let s: ChronicleSettings =
            serde_json::from_str(r#"{"retention": {"days": 7}}"#).unwrap();
        assert_eq!(s.retention.days, 7);
        assert_eq!(s.retention.prune_interval_hours, 24);
        assert_eq!(s.daemon.port, 8721);
    }

    #[test]
    fn serialize_round_trip() {
        let s = ChronicleSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: ChronicleSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.storage.dir, s.storage.dir);
        assert_eq!(back.retention.days, s.retention.days);
    }
}
