//! `chronicle status` — database statistics and daemon liveness.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::context::CliContext;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub fn run(ctx: &CliContext, _args: &StatusArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;
    let daemon_running = probe_daemon(&ctx.settings.daemon.host, ctx.settings.daemon.port);

    if ctx.json {
        let out = serde_json::json!({
            "daemon_running": daemon_running,
            "database_path": ctx.db_path,
            "stats": stats,
            "exclusion_rules": store.exclusions().len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Chronicle Status");
    println!("═══════════════════════════════════");
    println!(
        "Daemon:        {}",
        if daemon_running { "running" } else { "not running" }
    );
    println!("Database:      {}", ctx.db_path.display());
    println!("Events:        {} total", stats.total_events);
    println!("With content:  {}", stats.total_content);
    println!("DB size:       {}", format_bytes(stats.database_size_bytes));
    println!("Exclusions:    {} rules", store.exclusions().len());
    match (stats.oldest_event, stats.newest_event) {
        (Some(oldest), Some(newest)) => {
            println!("Oldest event:  {}", oldest.format("%Y-%m-%d %H:%M"));
            println!("Newest event:  {}", newest.format("%Y-%m-%d %H:%M"));
        }
        _ => println!("Oldest event:  (none)"),
    }
    if !stats.top_domains.is_empty() {
        println!();
        println!("Top domains:");
        for entry in &stats.top_domains {
            println!("  {:>6}  {}", entry.count, entry.domain);
        }
    }
    Ok(())
}

/// TCP probe against the daemon address. Any failure within the 1 second
/// budget (resolution, refusal, timeout) reads as "not running".
fn probe_daemon(host: &str, port: u16) -> bool {
    let Ok(mut addrs) = (host, port).to_socket_addrs() else {
        return false;
    };
    addrs.any(|addr| TcpStream::connect_timeout(&addr, Duration::from_secs(1)).is_ok())
}

fn format_bytes(n: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{n} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
