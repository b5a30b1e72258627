//! Wiki-Distill main entry point
//!
//! This is the command-line interface for the Wiki-Distill crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_distill::config::{load_config_with_hash, validate, Config};
use wiki_distill::crawler::crawl;

/// Wiki-Distill: flattens a wiki's content pages into annotated plain text
///
/// Fetches one index page, follows its content links, strips navigation
/// chrome from every detail page and writes the remaining text, with
/// headings, examples and list items marked, to a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "wiki-distill")]
#[command(version = "1.0.0")]
#[command(about = "Flattens wiki pages into structure-annotated text", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the output JSON path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if let Some(output) = cli.output {
        config.output.path = output.display().to_string();
        validate(&config).context("invalid output path")?;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_distill=info,warn"),
            1 => EnvFilter::new("wiki_distill=debug,info"),
            2 => EnvFilter::new("wiki_distill=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Wiki-Distill Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Index URL: {}", config.site.index_url);
    println!("  Index container: {}", config.site.index_container);
    println!("  Detail container: {}", config.site.detail_container);
    println!("  Link pattern: {}", config.site.link_pattern);
    println!(
        "  Excluded title markers: {}",
        config.site.excluded_title_markers.join(", ")
    );

    println!("\nFetcher:");
    println!("  Retry limit: {}", config.fetcher.retry_limit);
    println!("  Backoff base: {}ms", config.fetcher.backoff_base_ms);
    println!(
        "  Timeouts: {}ms / {}ms",
        config.fetcher.timeout_short_ms, config.fetcher.timeout_long_ms
    );
    println!("  Politeness delay: {}ms", config.fetcher.politeness_delay_ms);
    println!("  Verify TLS: {}", config.fetcher.verify_tls);

    println!("\nCleaner selectors ({}):", config.cleaner.selectors.len());
    for selector in &config.cleaner.selectors {
        println!("  - {}", selector);
    }

    println!("\nOutput: {}", config.output.path);
    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let output_path = config.output.path.clone();
    if !config.fetcher.verify_tls {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let report = crawl(config).await.context("crawl failed")?;

    for target in &report.targets_skipped {
        tracing::warn!("Not recorded: {} ({})", target.title, target.url);
    }

    println!(
        "\n✓ Saved {} of {} pages to: {}",
        report.records_written, report.targets_discovered, output_path
    );

    Ok(())
}
