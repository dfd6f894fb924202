//! `chronicle prune` — delete events past the retention window.

use std::io::Write;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Args;

use crate::context::CliContext;
use crate::duration::{format_duration_human, parse_duration};

#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Override the retention window (e.g. 30d, 24h, 2w).
    #[arg(long)]
    pub older_than: Option<String>,

    /// Report what would be pruned without deleting.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &CliContext, args: &PruneArgs) -> Result<()> {
    let window = match &args.older_than {
        Some(s) => parse_duration(s)?,
        None => Duration::days(i64::from(ctx.settings.retention.days)),
    };
    let cutoff = Utc::now() - window;

    let store = ctx.open_store()?;
    let expired = store.count_expired(cutoff)?;

    if args.dry_run {
        if ctx.json {
            println!(
                "{}",
                serde_json::json!({ "dry_run": true, "would_remove": expired })
            );
        } else {
            println!(
                "Would remove {expired} event(s) older than {}.",
                format_duration_human(window)
            );
        }
        return Ok(());
    }

    if expired == 0 {
        if !ctx.json {
            println!("Nothing to prune.");
        } else {
            println!("{}", serde_json::json!({ "removed": 0 }));
        }
        return Ok(());
    }

    if !args.force
        && !confirm(&format!(
            "Remove {expired} event(s) older than {}? [y/N] ",
            format_duration_human(window)
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }

    let removed = store.prune_expired(cutoff)?;
    if ctx.json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else {
        println!("Removed {removed} event(s).");
    }
    Ok(())
}

/// Prompt on stdout and read one line from stdin. Only `y`/`yes`
/// (case-insensitive) count as assent.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
