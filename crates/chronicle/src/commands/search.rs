//! `chronicle search` — query captured events.

use anyhow::Result;
use chrono::Utc;
use chronicle_core::{Event, SearchQuery, Source};
use clap::Args;

use crate::context::CliContext;
use crate::duration::parse_duration;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query. Omit to list by filters only.
    pub query: Option<String>,

    /// Exact domain filter.
    #[arg(long)]
    pub domain: Option<String>,

    /// Browser label filter.
    #[arg(long)]
    pub browser: Option<String>,

    /// Capture source filter (extension, manual, import).
    #[arg(long)]
    pub source: Option<String>,

    /// Only events newer than this duration (e.g. 7d, 24h).
    #[arg(long)]
    pub since: Option<String>,

    /// Only events older than this duration.
    #[arg(long)]
    pub until: Option<String>,

    /// Only events with captured body content.
    #[arg(long)]
    pub has_body: bool,

    /// Maximum results.
    #[arg(long, default_value_t = 50)]
    pub limit: i64,

    /// Skip the first N results.
    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}

pub fn run(ctx: &CliContext, args: &SearchArgs) -> Result<()> {
    let now = Utc::now();
    let source = match &args.source {
        Some(s) => Some(s.parse::<Source>().map_err(anyhow::Error::msg)?),
        None => None,
    };
    let since = match &args.since {
        Some(s) => Some(now - parse_duration(s)?),
        None => None,
    };
    let until = match &args.until {
        Some(s) => Some(now - parse_duration(s)?),
        None => None,
    };

    let query = SearchQuery {
        text: args.query.clone().unwrap_or_default(),
        domain: args.domain.clone(),
        browser: args.browser.clone(),
        source,
        since,
        until,
        has_body: args.has_body.then_some(true),
        has_embedding: None,
        limit: args.limit,
        offset: args.offset,
    };

    let store = ctx.open_store()?;
    let results = store.search(&query)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }
    for event in &results {
        print_line(event);
    }
    println!("{} result(s)", results.len());
    Ok(())
}

fn print_line(event: &Event) {
    let ts = event
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let id = event.id.as_deref().unwrap_or("-");
    println!("{ts}  {id}  [{}] {}", event.domain, event.title);
    println!("    {}", event.url);
}
