//! Hostwalk main entry point
//!
//! This is the command-line interface for the hostwalk crawler.

use anyhow::Context;
use clap::Parser;
use hostwalk::config::{load_config, validate, Config, ErrorPolicy};
use hostwalk::output::ConsolePrinter;
use hostwalk::start_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hostwalk: a same-host, depth-bounded web crawler
///
/// Crawls every page reachable from the seed URL on the same host, up to the
/// given depth, and prints each page with its links as it is fetched.
#[derive(Parser, Debug)]
#[command(name = "hostwalk")]
#[command(version)]
#[command(about = "A same-host, depth-bounded web crawler", long_about = None)]
struct Cli {
    /// URL to start the crawl on
    #[arg(short, long, value_name = "URL")]
    url: String,

    /// Depth of lookup from the seed page [default: 4]
    #[arg(short, long)]
    depth: Option<u32>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Abort the whole crawl on the first fetch or parse failure
    #[arg(long)]
    fail_fast: bool,

    /// Maximum number of concurrent page fetches (unbounded by default)
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Per-request timeout in seconds [default: 60]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(depth) = self.depth {
            config.crawler.max_depth = depth;
        }
        if let Some(max) = self.max_concurrent {
            config.crawler.max_concurrent_fetches = Some(max);
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout_secs = timeout;
        }
        if self.fail_fast {
            config.crawler.error_policy = ErrorPolicy::Abort;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("invalid configuration")?;

    let mut session =
        start_crawl(&config, &cli.url).with_context(|| format!("failed to crawl {}", cli.url))?;

    let mut printer = ConsolePrinter::new(std::io::stdout());
    while let Some(page) = session.next_page().await {
        printer.print_page(&page)?;
        tracing::debug!(
            "Received {} (depth {}), {} URLs claimed so far",
            page.url,
            page.depth,
            session.urls_claimed()
        );
    }

    match session.finish().await {
        Ok(summary) => {
            tracing::info!("{}", summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they never interleave with the page listing on stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostwalk=info,warn"),
            1 => EnvFilter::new("hostwalk=debug,info"),
            2 => EnvFilter::new("hostwalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
