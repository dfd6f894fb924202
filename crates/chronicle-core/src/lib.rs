//! # chronicle-core
//!
//! Foundation types for Chronicle: the shared vocabulary that the store and
//! CLI crates depend on.
//!
//! - **Events**: [`types::Event`], one recorded browsing action
//! - **Content**: [`types::Content`], the captured body text for an event
//! - **Exclusions**: [`types::ExclusionRule`] / [`types::RuleKind`] privacy rules
//! - **Queries**: [`types::SearchQuery`] with filters and pagination
//! - **Stats**: [`types::Stats`] / [`types::DomainCount`] aggregates
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other chronicle crates. No I/O.

#![deny(unsafe_code)]

pub mod types;

pub use types::{
    Content, DomainCount, Event, ExclusionRule, RuleKind, SearchQuery, Source, Stats,
};
