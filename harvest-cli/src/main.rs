//! Harvest — pull your recent activity events into a local append-only log.
//!
//! # Usage
//!
//! ```text
//! harvest
//! ```
//!
//! One invocation, no flags or subcommands: load the `(login, token)`
//! credential pair, fetch the account's activity feed, append whatever is
//! newer than the log's last line. Exit code 0 on success (an empty delta
//! is success), 1 on any fatal condition with a `fatal:` line on stderr.

mod feed;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;

use harvest_core::config;
use harvest_sync::pipeline;

use feed::EventFeed;

#[derive(Parser, Debug)]
#[command(
    name = "harvest",
    version,
    about = "Collect your recent activity events into a local append-only log",
    long_about = None,
)]
struct Cli {}

fn main() {
    env_logger::init();
    let _cli = Cli::parse();

    if let Err(err) = run() {
        // One line, error stream, non-zero exit. No retries, no partial
        // recovery: the log is exactly as it was before the run.
        eprintln!("fatal: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Credentials first; any problem here fails before a single request.
    let config = config::load().context("could not load configuration")?;

    let mut source = EventFeed::new(&config);
    let outcome = pipeline::run(&config.log_path, &mut source, feed::MAX_PAGES)
        .with_context(|| format!("sync failed for '{}'", config.login))?;

    if outcome.appended > 0 && std::io::stdout().is_terminal() {
        println!("Fetched {} events", outcome.appended);
    }
    Ok(())
}
