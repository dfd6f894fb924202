//! `chronicle purge` — delete all captured data.

use anyhow::{bail, Result};
use clap::Args;

use crate::commands::prune::confirm;
use crate::context::CliContext;

#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Required to confirm purge intent.
    #[arg(long)]
    pub all: bool,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &CliContext, args: &PurgeArgs) -> Result<()> {
    if !args.all {
        bail!("--all is required to confirm purge intent");
    }

    let store = ctx.open_store()?;
    let total = store.stats()?.total_events;

    if !args.force
        && !confirm(&format!(
            "Permanently delete ALL {total} event(s) and their content? [y/N] "
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }

    store.purge_all()?;
    if ctx.json {
        println!("{}", serde_json::json!({ "purged": total }));
    } else {
        println!("Purged {total} event(s). Exclusion rules were kept.");
    }
    Ok(())
}
