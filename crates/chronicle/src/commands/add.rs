//! `chronicle add` — manually record a browsing event.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chronicle_core::{Event, Source};
use clap::Args;

use crate::context::CliContext;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// URL to record.
    #[arg(long)]
    pub url: String,

    /// Page title.
    #[arg(long)]
    pub title: String,

    /// Inline body text.
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Path to a file containing the body.
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Source browser label.
    #[arg(long, default_value = "manual")]
    pub browser: String,
}

pub fn run(ctx: &CliContext, args: &AddArgs) -> Result<()> {
    // Strict validation up front: the store tolerates odd URLs for passive
    // capture, but manual entry should reject them loudly.
    let parsed = url::Url::parse(&args.url)
        .with_context(|| format!("invalid URL: {}", args.url))?;
    if parsed.host_str().is_none() {
        bail!("invalid URL: {} (no host)", args.url);
    }
    if args.title.trim().is_empty() {
        bail!("--title must not be empty");
    }

    let body = match &args.body_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read body file {}", path.display()))?,
        ),
        None => args.body.clone(),
    };

    let store = ctx.open_store()?;
    let mut event = Event {
        url: args.url.clone(),
        title: args.title.clone(),
        source: Source::Manual,
        browser: args.browser.clone(),
        ..Default::default()
    };

    match &body {
        Some(text) => store.add_event_with_content(&mut event, text)?,
        None => store.add_event(&mut event)?,
    }

    // The store signals an exclusion skip by leaving the id unset. For
    // manual entry that silence becomes an explicit error.
    let Some(id) = &event.id else {
        bail!("domain {:?} is excluded by privacy rules", event.domain);
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        println!("Added {id} ({})", event.domain);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_settings::ChronicleSettings;

    fn ctx(dir: &tempfile::TempDir) -> CliContext {
        CliContext::new(
            ChronicleSettings::default(),
            Some(dir.path().join("c.db")),
            false,
        )
    }

    fn add_args(url: &str) -> AddArgs {
        AddArgs {
            url: url.to_string(),
            title: "Title".to_string(),
            body: None,
            body_file: None,
            browser: "manual".to_string(),
        }
    }

    #[test]
    fn excluded_domain_is_an_explicit_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&ctx(&dir), &add_args("https://chase.com/login")).unwrap_err();
        assert!(
            err.to_string().contains("excluded"),
            "unexpected error: {err}"
        );

        // The skip is an error at this boundary, not a write.
        let store = ctx(&dir).open_store().unwrap();
        assert_eq!(store.stats().unwrap().total_events, 0);
    }

    #[test]
    fn valid_url_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        run(&ctx(&dir), &add_args("https://example.com/post")).unwrap();

        let store = ctx(&dir).open_store().unwrap();
        assert_eq!(store.stats().unwrap().total_events, 1);
    }

    #[test]
    fn hostless_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&ctx(&dir), &add_args("not a url")).is_err());
        assert!(run(&ctx(&dir), &add_args("file:///etc/hosts")).is_err());
    }
}
