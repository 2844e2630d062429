use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use feedscout::config::Config;
use feedscout::feed::{Scout, ScoutReport, DEFAULT_SEED};
use feedscout::util::printable_line;

/// Get the default config file path (~/.config/feedscout/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedscout")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedscout",
    version,
    about = "Find RSS feeds linked from websites"
)]
struct Args {
    /// Landing pages to inspect (overrides `seeds` from the config file)
    #[arg(value_name = "URL")]
    seeds: Vec<String>,

    /// Config file (default: ~/.config/feedscout/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the full report, including skipped URLs, as JSON
    #[arg(long)]
    json: bool,

    /// Allow requests to localhost and private network addresses
    #[arg(long)]
    allow_private_hosts: bool,
}

/// Command-line seeds win over configured seeds; with neither, the built-in seed is used.
fn choose_seeds(cli: Vec<String>, configured: Vec<String>) -> Vec<String> {
    if !cli.is_empty() {
        cli
    } else if !configured.is_empty() {
        configured
    } else {
        vec![DEFAULT_SEED.to_owned()]
    }
}

fn print_report(report: &ScoutReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{out}");
        return Ok(());
    }

    for feed in &report.feeds {
        println!("{}", printable_line(feed));
    }

    if !report.failures.is_empty() {
        eprintln!(
            "Skipped {} URL(s) that could not be fetched (set RUST_LOG=warn for details)",
            report.failures.len()
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if args.allow_private_hosts {
        config.allow_private_hosts = true;
    }

    let seeds = choose_seeds(args.seeds, std::mem::take(&mut config.seeds));
    let client = config
        .build_client()
        .context("Failed to build HTTP client")?;

    tracing::info!(seeds = seeds.len(), "Starting feed discovery");

    let scout = Scout::new(client, config.fetch_policy());
    let report = scout.run(&seeds).await;

    print_report(&report, args.json)
}
