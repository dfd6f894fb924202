//! # chronicle-settings
//!
//! Configuration management with layered sources for Chronicle.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. Compiled defaults ([`ChronicleSettings::default()`])
//! 2. User file `~/.config/chronicle/settings.json`, deep-merged over defaults
//! 3. `CHRONICLE_*` environment variables (highest priority)
//!
//! The file is optional: a missing file means defaults, a malformed file is
//! an error. Settings describe where the database lives, the retention
//! window, extra denylist entries, and the daemon address for the status
//! probe. The curated default denylist is not here; it ships inside the
//! database schema.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    database_path, deep_merge, expand_home, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;
