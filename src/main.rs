//! Catalog-Walker main entry point
//!
//! This is the command-line interface for the catalog walker.

use anyhow::Context;
use catalog_walker::config::{load_config_with_hash, validate, Config};
use catalog_walker::crawler::crawl;
use catalog_walker::output::print_summary;
use catalog_walker::PageUrlTemplate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Walker: a paginated product-listing crawler
///
/// Catalog-Walker walks a category listing page by page, collects the
/// product links and the product count from each page, and writes one CSV
/// row per product. Pages whose plain HTML carries no links are loaded again
/// in a headless browser.
#[derive(Parser, Debug)]
#[command(name = "catalog-walker")]
#[command(version = "1.0.0")]
#[command(about = "A paginated product-listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the last page to request
    #[arg(long, value_name = "PAGE")]
    ceiling: Option<u32>,

    /// Disable the browser rendering fallback
    #[arg(long)]
    no_render: bool,

    /// Override the CSV output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate(&config).context("Command-line overrides produced an invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_walker=info,warn"),
            1 => EnvFilter::new("catalog_walker=debug,info"),
            2 => EnvFilter::new("catalog_walker=trace,debug"),
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

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ceiling) = cli.ceiling {
        config.crawl.page_ceiling = ceiling;
    }
    if cli.no_render {
        config.render.enabled = false;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog-Walker Dry Run ===\n");

    println!("Category:");
    println!("  Name: {}", config.category.name);
    println!("  URL: {}", config.category.url);

    println!("\nPages:");
    println!("  Template: {}", config.crawl.seed_url_template);
    println!(
        "  Range: {}..={}",
        config.crawl.first_page, config.crawl.page_ceiling
    );
    println!("  On exhausted page: {:?}", config.crawl.on_exhausted);
    let template = PageUrlTemplate::parse(&config.crawl.seed_url_template)?;
    println!("  First URL: {}", template.url_for(config.crawl.first_page)?);
    println!("  Last URL: {}", template.url_for(config.crawl.page_ceiling)?);

    println!("\nRetry:");
    println!("  Max retries: {}", config.retry.max_retries);
    println!("  Delay: {}ms", config.retry.delay_ms);

    println!("\nRendering fallback:");
    if config.render.enabled {
        println!("  Headless: {}", config.render.headless);
        println!("  Settle timeout: {}s", config.render.settle_timeout_secs);
    } else {
        println!("  Disabled");
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    match &config.output.cache_dir {
        Some(dir) => println!("  Cache: {}", dir),
        None => println!("  Cache: off"),
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would request {} pages",
        config.crawl.page_ceiling - config.crawl.first_page + 1
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} (pages {}..={})",
        config.category.name,
        config.crawl.first_page,
        config.crawl.page_ceiling
    );

    match crawl(config).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
