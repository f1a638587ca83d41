//! Spinneret main entry point
//!
//! This is the command-line interface for the Spinneret web crawler.

use clap::Parser;
use spinneret::config::{load_overlay, validate, Config};
use spinneret::crawler::crawl;
use spinneret::SpinneretError;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Spinneret: a concurrent secret-hunting web crawler
///
/// Spinneret crawls from the given seed URLs breadth-first, extracting
/// outbound links and credential-shaped strings from every page, with
/// hostname allow/deny filtering and graceful Ctrl-C shutdown.
#[derive(Parser, Debug)]
#[command(name = "spinneret")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent secret-hunting web crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    url: Vec<String>,

    /// File with whitespace-separated seed URLs ("-" for stdin)
    #[arg(short = 'f', long = "url-file", value_name = "PATH")]
    url_file: Option<PathBuf>,

    /// Maximum crawl depth (0 = unlimited)
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Only fetch pages on the seed URL hostnames
    #[arg(short, long)]
    base: bool,

    /// Comma-separated hostname globs a discovered URL must match
    #[arg(long, value_name = "LIST")]
    allowed_domains: Option<String>,

    /// Comma-separated hostname globs that reject a discovered URL
    #[arg(long, value_name = "LIST")]
    disallowed_domains: Option<String>,

    /// Directory to export discovered secrets to (one CSV per hostname)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Milliseconds each worker pauses between jobs
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let seeds = match collect_seeds(&cli) {
        Ok(seeds) => seeds,
        Err(e) => {
            tracing::error!("Failed to collect seed URLs: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Loaded {} seed URLs", seeds.len());

    match crawl(config, seeds).await {
        Ok(_report) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spinneret=info,warn"),
            1 => EnvFilter::new("spinneret=debug,info"),
            2 => EnvFilter::new("spinneret=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves the run configuration: defaults, then the optional config
/// file, then explicit command-line flags on top
fn resolve_config(cli: &Cli) -> spinneret::Result<Config> {
    let mut config = Config::default();

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
        config.merge_file(load_overlay(path)?);
    }

    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if cli.base {
        config.base = true;
    }
    if let Some(list) = &cli.allowed_domains {
        config.allowed_domains = split_domain_list(list);
    }
    if let Some(list) = &cli.disallowed_domains {
        config.disallowed_domains = split_domain_list(list);
    }
    if let Some(output) = &cli.output {
        config.output = Some(output.clone());
    }
    if let Some(interval) = cli.interval {
        config.interval = Some(interval);
    }

    validate(&config)?;
    Ok(config)
}

/// Splits a comma-separated domain list, trimming each entry
fn split_domain_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Collects seed URLs from --url flags, a --url-file, or piped stdin
///
/// File and stdin input is split on whitespace. Consecutive duplicate
/// entries are dropped; any entry that does not parse as a URL is fatal.
fn collect_seeds(cli: &Cli) -> spinneret::Result<Vec<Url>> {
    let mut raw: Vec<String> = cli.url.clone();

    if let Some(path) = &cli.url_file {
        let content = if path.as_os_str() == "-" {
            read_stdin()?
        } else {
            std::fs::read_to_string(path)?
        };
        raw.extend(content.split_whitespace().map(str::to_string));
    } else if raw.is_empty() && !std::io::stdin().is_terminal() {
        raw.extend(read_stdin()?.split_whitespace().map(str::to_string));
    }

    raw.dedup();

    let mut seeds = Vec::with_capacity(raw.len());
    for entry in raw {
        match Url::parse(&entry) {
            Ok(url) => seeds.push(url),
            Err(source) => return Err(SpinneretError::Seed { url: entry, source }),
        }
    }

    if seeds.is_empty() {
        return Err(SpinneretError::NoSeeds);
    }
    Ok(seeds)
}

fn read_stdin() -> std::io::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}
