//! Human-friendly duration parsing for retention flags.

use anyhow::{bail, Result};
use chrono::Duration;

/// Parse a duration string like `30d`, `24h`, `2w`, `45m`, or `10s`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    if s.chars().count() < 2 {
        bail!("invalid duration: {s:?} (use a number with a d, h, w, m, or s suffix)");
    }

    // Split on a char boundary; the suffix may be any final character,
    // including a multibyte one, and must fail as invalid rather than panic.
    let (last_idx, _) = s
        .char_indices()
        .last()
        .ok_or_else(|| anyhow::anyhow!("invalid duration: empty string"))?;
    let num = &s[..last_idx];
    let suffix = &s[last_idx..];
    let n: i64 = num
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid duration: {s:?}"))?;
    if n < 0 {
        bail!("invalid duration: {s:?} (must be non-negative)");
    }

    match suffix {
        "d" => Ok(Duration::days(n)),
        "h" => Ok(Duration::hours(n)),
        "w" => Ok(Duration::weeks(n)),
        "m" => Ok(Duration::minutes(n)),
        "s" => Ok(Duration::seconds(n)),
        _ => bail!("invalid duration: {s:?} (use d, h, w, m, or s suffix)"),
    }
}

/// Format a duration as a short human-readable phrase, e.g. "30 days".
pub fn format_duration_human(d: Duration) -> String {
    let days = d.num_days();
    if days > 0 {
        return if days == 1 {
            "1 day".to_string()
        } else {
            format!("{days} days")
        };
    }
    let hours = d.num_hours();
    if hours > 0 {
        return if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{hours} hours")
        };
    }
    let minutes = d.num_minutes();
    if minutes > 0 {
        return format!("{minutes} minutes");
    }
    format!("{} seconds", d.num_seconds())
}
