//! `chronicle open` — print the stored content of one event.

use anyhow::{bail, Result};
use clap::Args;

use crate::context::CliContext;

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Event id (evt_...).
    pub id: String,

    /// Output format: md, raw, or json.
    #[arg(long, default_value = "md")]
    pub format: String,
}

pub fn run(ctx: &CliContext, args: &OpenArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let event = store.get_event(&args.id)?;

    let body = if event.has_body {
        Some(store.get_content(&args.id)?)
    } else {
        None
    };

    match args.format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "event": event,
                "content": body.as_ref().map(|c| &c.body),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        "raw" => match &body {
            Some(content) => println!("{}", content.body),
            None => bail!("event {} has no stored content", args.id),
        },
        "md" => {
            println!("# {}", event.title);
            println!();
            println!("- URL: {}", event.url);
            println!("- Domain: {}", event.domain);
            if let Some(ts) = event.timestamp {
                println!("- Captured: {}", ts.to_rfc3339());
            }
            println!("- Source: {} ({})", event.source, event.browser);
            if let Some(content) = &body {
                println!();
                println!("{}", content.body);
            }
        }
        other => bail!("unknown format {other:?} (use md, raw, or json)"),
    }
    Ok(())
}
