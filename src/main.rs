//! Kumo main entry point
//!
//! Command-line interface for the kumo web crawler.

use clap::Parser;
use kumo::config::{load_config, CrawlConfig};
use kumo::crawler::{CrawlEngine, CrawlEvent};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kumo: an event-driven concurrent web crawler
///
/// Kumo crawls outward from a seed URL, fetching HTML pages and following
/// their links, subject to the configured admission rules (page caps,
/// per-domain caps, timeout, external-page policy).
#[derive(Parser, Debug)]
#[command(name = "kumo")]
#[command(version)]
#[command(about = "An event-driven concurrent web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and show what would be crawled, without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => CrawlConfig::default(),
    };

    if cli.dry_run {
        handle_dry_run(&cli.seed, &config);
        return Ok(());
    }

    let mut engine = CrawlEngine::new(config)?;
    engine.on_event(log_event);

    let result = engine.crawl(&cli.seed).await?;
    println!(
        "Crawled {} pages from {} in {:.2?}",
        result.pages_crawled, result.root_url, result.elapsed
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo=info,warn"),
            1 => EnvFilter::new("kumo=debug,info"),
            2 => EnvFilter::new("kumo=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Logs each lifecycle event as the crawl progresses
fn log_event(event: &CrawlEvent) {
    match event {
        CrawlEvent::PageCrawlStarting(page) => {
            tracing::info!("fetching {}", page.url);
        }
        CrawlEvent::PageCrawlCompleted(crawled) => match &crawled.response {
            Some(response) => tracing::info!(
                "{} {} ({} bytes)",
                response.status,
                crawled.page.url,
                crawled.page_size_in_bytes
            ),
            None => tracing::warn!(
                "{} failed: {}",
                crawled.page.url,
                crawled.request_error.as_deref().unwrap_or("no response")
            ),
        },
        CrawlEvent::PageCrawlDisallowed { page, reason } => {
            tracing::debug!("skipped {}: {}", page.url, reason);
        }
        CrawlEvent::PageLinksCrawlDisallowed { page, reason } => {
            tracing::debug!("links skipped for {}: {}", page.page.url, reason);
        }
    }
}

/// Handles --dry-run: prints the effective configuration and exits
fn handle_dry_run(seed: &str, config: &CrawlConfig) {
    println!("=== Kumo Dry Run ===\n");
    println!("Seed: {seed}\n");
    println!("Crawler Configuration:");
    println!("  Max pages to crawl: {}", config.max_pages_to_crawl);
    println!(
        "  Max pages per domain: {}",
        config.max_pages_to_crawl_per_domain
    );
    println!(
        "  Crawl timeout: {}",
        if config.crawl_timeout_seconds == 0 {
            "unlimited".to_string()
        } else {
            format!("{}s", config.crawl_timeout_seconds)
        }
    );
    println!("  Max concurrent threads: {}", config.max_concurrent_threads);
    println!(
        "  External page crawling: {}",
        config.is_external_page_crawling_enabled
    );
    println!(
        "  External page links: {}",
        config.is_external_page_links_crawling_enabled
    );
    println!("  User agent: {}", config.user_agent_string);
    println!("\n✓ Configuration is valid");
}
