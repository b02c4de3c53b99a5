//! Site-Cartographer main entry point
//!
//! This is the command-line interface for the Site-Cartographer sitemap generator.

use anyhow::Context;
use clap::Parser;
use site_cartographer::config::{compute_config_hash, read_config, validate_config, Config};
use site_cartographer::crawler::crawl;
use site_cartographer::output::{print_statistics, write_sitemap_file};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Cartographer: a single-site sitemap generator
///
/// Crawls every same-domain page reachable from a seed URL and writes a
/// sitemap of the pages (and their images) that search engines may index.
#[derive(Parser, Debug)]
#[command(name = "site-cartographer")]
#[command(version)]
#[command(about = "A single-site sitemap generator", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (overrides the config file)
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Protocol every crawled URL is coerced to (http or https)
    #[arg(long)]
    protocol: Option<String>,

    /// Substring pattern excluding page URLs and image sources (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Leave images out of the sitemap
    #[arg(long)]
    no_images: bool,

    /// Include pages carrying a noindex robots directive
    #[arg(long)]
    ignore_noindex: bool,

    /// Do not follow links on pages carrying a nofollow robots directive
    #[arg(long)]
    honor_nofollow: bool,

    /// Maximum number of concurrent fetches
    #[arg(short, long)]
    workers: Option<usize>,

    /// Hard deadline for the whole crawl, in seconds
    #[arg(long, value_name = "SECONDS")]
    deadline: Option<u64>,

    /// Where to write the sitemap ("-" for stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the effective configuration, print it and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate_config(&config).context("Invalid configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so a sitemap written to stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_cartographer=info,warn"),
            1 => EnvFilter::new("site_cartographer=debug,info"),
            2 => EnvFilter::new("site_cartographer=trace,debug"),
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

/// Layers command-line flags over the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    let crawler = &mut config.crawler;

    if let Some(seed) = &cli.seed {
        crawler.seed_url = seed.clone();
    }
    if let Some(protocol) = &cli.protocol {
        crawler.protocol = Some(protocol.clone());
    }
    crawler.exclude.extend(cli.exclude.iter().cloned());
    if cli.no_images {
        crawler.include_images = false;
    }
    if cli.ignore_noindex {
        crawler.ignore_noindex = true;
    }
    if cli.honor_nofollow {
        crawler.honor_nofollow = true;
    }
    if let Some(workers) = cli.workers {
        crawler.workers = workers;
    }
    if let Some(deadline) = cli.deadline {
        crawler.deadline_secs = Some(deadline);
    }
    if let Some(output) = &cli.output {
        config.output.sitemap_path = output.clone();
    }
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;

    println!("=== Site-Cartographer Dry Run ===\n");
    println!("{}", rendered);
    println!("✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.crawler.seed_url);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seed: {}, workers: {}, exclusions: {}, images: {}",
        config.crawler.seed_url,
        config.crawler.workers,
        config.crawler.exclude.len(),
        config.crawler.include_images
    );

    let report = match crawl(&config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_sitemap_file(&report.sitemap, &config.output)
        .with_context(|| format!("Failed to write sitemap to {}", config.output.sitemap_path))?;

    tracing::info!("Crawl completed successfully");
    print_statistics(&report.statistics);

    Ok(())
}
