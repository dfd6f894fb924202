//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ChronicleSettings::default()`]
//! 2. If `~/.config/chronicle/settings.json` exists, deep-merge user values
//!    over defaults
//! 3. Apply `CHRONICLE_*` environment overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::ChronicleSettings;

/// Expand a leading `~` to the home directory. `HOME` missing falls back
/// to `/tmp` so tests and stripped-down environments still get a path.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}

/// Resolve the path to the settings file (`~/.config/chronicle/settings.json`).
pub fn settings_path() -> PathBuf {
    expand_home("~/.config/chronicle").join("settings.json")
}

/// Resolve the database file path from loaded settings.
pub fn database_path(settings: &ChronicleSettings) -> PathBuf {
    expand_home(&settings.storage.dir).join(&settings.storage.sqlite_file)
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ChronicleSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<ChronicleSettings> {
    let defaults = serde_json::to_value(ChronicleSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: ChronicleSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `CHRONICLE_*` environment variable overrides.
///
/// Invalid values are logged and ignored, falling back to file/default.
pub fn apply_env_overrides(settings: &mut ChronicleSettings) {
    if let Some(v) = read_env_string("CHRONICLE_DATA_DIR") {
        settings.storage.dir = v;
    }
    if let Some(v) = read_env_string("CHRONICLE_DB_FILE") {
        settings.storage.sqlite_file = v;
    }
    if let Some(v) = read_env_string("CHRONICLE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_string("CHRONICLE_DAEMON_HOST") {
        settings.daemon.host = v;
    }
    if let Some(v) = read_env_u16("CHRONICLE_DAEMON_PORT", 1, 65535) {
        settings.daemon.port = v;
    }
    if let Some(v) = read_env_u32("CHRONICLE_RETENTION_DAYS", 1, 36_500) {
        settings.retention.days = v;
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}
