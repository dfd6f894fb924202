//! Domain types for captured browsing activity.
//!
//! [`Event`] is the unit of capture. Its `id` is assigned by the store at
//! write time and stays `None` when the event's domain is excluded by a
//! privacy rule, so callers can tell "persisted" from "deliberately skipped"
//! without an error channel.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an event came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Captured passively by the browser extension.
    #[default]
    Extension,
    /// Entered by hand via the CLI.
    Manual,
    /// Bulk-imported from an external history file.
    Import,
}

impl Source {
    /// SQL text representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Extension => "extension",
            Source::Manual => "manual",
            Source::Import => "import",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extension" => Ok(Source::Extension),
            "manual" => Ok(Source::Manual),
            "import" => Ok(Source::Import),
            other => Err(format!("unknown source: {other}")),
        }
    }
}

/// One recorded browsing action.
///
/// `domain` is always re-derived from `url` by the store at write time and
/// never trusted from caller input. `timestamp` defaults to "now" when left
/// `None`. The `has_body` / `has_embedding` flags are the only fields that
/// change after creation, and only when related content is attached.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier. `None` until persisted, and left `None`
    /// when the event was skipped by an exclusion rule.
    pub id: Option<String>,
    /// The visited URL.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Host component of `url`, derived at write time.
    pub domain: String,
    /// Capture time (UTC). Defaults to now when `None`.
    pub timestamp: Option<DateTime<Utc>>,
    /// Capture source.
    pub source: Source,
    /// Originating browser label (e.g. "firefox").
    pub browser: String,
    /// SHA-256 of the attached body, for deduplication.
    pub content_hash: Option<String>,
    /// Whether body content is stored for this event.
    pub has_body: bool,
    /// Whether an embedding exists for this event.
    pub has_embedding: bool,
}

/// Captured body text for an event. One-to-one with [`Event`], owned by it:
/// deleting the event deletes its content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Owning event id.
    pub event_id: String,
    /// Body text.
    pub body: String,
    /// Stored format tag (e.g. "md").
    pub format: String,
    /// Byte size of `body` at capture time.
    pub byte_size: i64,
}

/// The kind of an exclusion rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Exact domain match.
    Domain,
    /// Regular expression matched against the domain.
    Regex,
}

impl RuleKind {
    /// SQL text representation.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Domain => "domain",
            RuleKind::Regex => "regex",
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(RuleKind::Domain),
            "regex" => Ok(RuleKind::Regex),
            other => Err(format!("unknown rule kind: {other}")),
        }
    }
}

/// A privacy rule preventing capture for a domain or domain pattern.
///
/// Rules are evaluated against the domain component only, never the full URL.
/// `(kind, value)` pairs are unique in storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// Rule kind.
    pub kind: RuleKind,
    /// Domain or pattern text.
    pub value: String,
    /// Human-readable reason.
    pub reason: String,
    /// Whether this rule came from the curated default set.
    pub is_default: bool,
}

impl ExclusionRule {
    /// Convenience constructor for an exact-domain rule.
    pub fn domain(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Domain,
            value: value.into(),
            reason: reason.into(),
            is_default: false,
        }
    }

    /// Convenience constructor for a pattern rule.
    pub fn regex(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Regex,
            value: value.into(),
            reason: reason.into(),
            is_default: false,
        }
    }
}

/// Filters and pagination for a search.
///
/// With non-empty `text` the store runs a full-text lookup ranked by
/// relevance; otherwise a plain filtered scan ordered most-recent-first.
/// `limit`/`offset` pages are not stable under concurrent writes; callers
/// needing stronger consistency should re-query rather than paginate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text term. Whitespace tokens become prefix matches.
    pub text: String,
    /// Exact domain filter.
    pub domain: Option<String>,
    /// Browser label filter.
    pub browser: Option<String>,
    /// Capture source filter.
    pub source: Option<Source>,
    /// Only events at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Only events at or before this time.
    pub until: Option<DateTime<Utc>>,
    /// Only events with (or without) stored body content.
    pub has_body: Option<bool>,
    /// Only events with (or without) an embedding.
    pub has_embedding: Option<bool>,
    /// Maximum results. Non-positive means the default page size (50).
    pub limit: i64,
    /// Results to skip.
    pub offset: i64,
}

impl SearchQuery {
    /// Default page size used when `limit` is unset or non-positive.
    pub const DEFAULT_LIMIT: i64 = 50;

    /// Effective limit after applying the default.
    pub fn effective_limit(&self) -> i64 {
        if self.limit > 0 {
            self.limit
        } else {
            Self::DEFAULT_LIMIT
        }
    }

    /// Effective offset, clamped at zero.
    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// A domain with its event count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    /// Domain text.
    pub domain: String,
    /// Number of events for that domain.
    pub count: i64,
}

/// Aggregate statistics over the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Total event rows.
    pub total_events: i64,
    /// Total content rows.
    pub total_content: i64,
    /// Oldest event timestamp, if any events exist.
    pub oldest_event: Option<DateTime<Utc>>,
    /// Newest event timestamp, if any events exist.
    pub newest_event: Option<DateTime<Utc>>,
    /// Approximate on-disk size in bytes.
    pub database_size_bytes: i64,
    /// Top domains by event count, descending.
    pub top_domains: Vec<DomainCount>,
}
