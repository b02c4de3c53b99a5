//! Crawler module for page fetching and crawl scheduling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML extraction of canonical URL, robots directives, links and images
//! - The shared frontier of pending and visited URLs
//! - The wave-synchronous scheduler

mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{ImageRef, Page};
pub use scheduler::{CrawlReport, Scheduler};

use crate::config::{validate_config, Config};
use crate::CartographerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Seed the frontier and crawl wave by wave
/// 4. Return the finished sitemap with crawl statistics
///
/// # Errors
///
/// Only configuration problems (and a client that cannot be built) are
/// returned; per-page failures are logged and counted in the statistics.
pub async fn crawl(config: &Config) -> Result<CrawlReport, CartographerError> {
    validate_config(config)?;

    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let scheduler = Scheduler::new(&config.crawler, fetcher)?;

    scheduler.run().await
}
