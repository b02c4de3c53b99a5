//! Wave-synchronous crawl scheduler
//!
//! The scheduler owns the crawl's explicit context (frontier, normalizer,
//! inclusion policy, fetcher) and drives it through
//! `Idle -> Running -> Draining -> (Running | Done)`:
//! - `Running` drains the whole pending set as one wave
//! - each URL of the wave is fetched by its own task, at most `workers` at a time
//! - `Draining` waits for every task of the wave before the next drain
//!
//! Workers touch only the frontier; entries and statistics are committed by
//! the scheduler as each task completes.

use crate::config::{CrawlerConfig, MAX_WORKERS};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::Page;
use crate::output::CrawlStatistics;
use crate::sitemap::{InclusionPolicy, PageVerdict, Sitemap, SitemapBuilder};
use crate::state::{CrawlState, PageState};
use crate::url::{normalize_seed, UrlNormalizer};
use crate::{CartographerError, ConfigError, FetchError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

/// The result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub sitemap: Sitemap,
    pub statistics: CrawlStatistics,
}

/// Everything a worker needs, shared read-only across a wave
struct CrawlContext<F> {
    fetcher: F,
    frontier: Frontier,
    normalizer: UrlNormalizer,
    policy: InclusionPolicy,
    honor_nofollow: bool,
}

/// Link discovery counters for one page
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LinkTally {
    enqueued: u64,
    rejected: u64,
    excluded: u64,
}

/// A page that was fetched and evaluated
struct ProcessedPage {
    verdict: PageVerdict,
    links: LinkTally,
}

/// What a worker hands back to the scheduler
struct PageReport {
    url: Url,
    result: Result<ProcessedPage, CartographerError>,
}

/// Drives one crawl from seed to finished sitemap
pub struct Scheduler<F: Fetcher> {
    ctx: Arc<CrawlContext<F>>,
    builder: SitemapBuilder,
    stats: CrawlStatistics,
    state: CrawlState,
    workers: usize,
    deadline: Option<Duration>,
}

impl<F: Fetcher> Scheduler<F> {
    /// Creates a scheduler with the frontier seeded from `config.seed_url`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the seed URL or protocol is unusable; the
    /// crawl never starts in that case.
    pub fn new(config: &CrawlerConfig, fetcher: F) -> Result<Self, ConfigError> {
        let protocol = config.target_protocol()?;
        let seed = normalize_seed(&config.seed_url, protocol)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.seed_url, e)))?;
        let normalizer = UrlNormalizer::new(&seed, protocol)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.seed_url, e)))?;

        tracing::debug!(
            "Seeding frontier with {} (authority {}, protocol {})",
            seed,
            normalizer.authority(),
            protocol
        );

        let policy = InclusionPolicy::new(
            config.include_images,
            config.ignore_noindex,
            config.exclusion_rules(),
        );

        let ctx = CrawlContext {
            fetcher,
            frontier: Frontier::with_seed(seed),
            normalizer,
            policy,
            honor_nofollow: config.honor_nofollow,
        };

        Ok(Self {
            ctx: Arc::new(ctx),
            builder: SitemapBuilder::new(config.include_images),
            stats: CrawlStatistics::new(),
            state: CrawlState::Idle,
            workers: config.workers.clamp(1, MAX_WORKERS),
            deadline: config.deadline(),
        })
    }

    /// Overrides the hard deadline from the configuration
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.ctx.frontier
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), CartographerError> {
        if !self.state.can_transition_to(next) {
            return Err(CartographerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs the crawl to completion
    ///
    /// Per-page failures never end the crawl. The only way to stop early is
    /// the hard deadline, after which every entry committed so far is kept.
    pub async fn run(mut self) -> Result<CrawlReport, CartographerError> {
        self.stats = CrawlStatistics::new();
        self.transition(CrawlState::Running)?;

        let deadline = self.deadline.map(|d| Instant::now() + d);
        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.ctx.normalizer.authority(),
            self.workers
        );

        loop {
            let batch = self.ctx.frontier.drain_pending_batch();
            if batch.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            self.stats.waves += 1;
            tracing::info!(
                "Wave {}: fetching {} pages ({} visited so far)",
                self.stats.waves,
                batch.len(),
                self.ctx.frontier.visited_len()
            );

            let completed = self.run_wave(batch, deadline).await?;
            if !completed {
                self.stats.deadline_hit = true;
                tracing::warn!(
                    "Crawl deadline reached during wave {}, keeping {} committed entries",
                    self.stats.waves,
                    self.builder.len()
                );
                break;
            }

            self.transition(CrawlState::Running)?;
        }

        self.transition(CrawlState::Done)?;
        self.stats.finish();

        tracing::info!(
            "Crawl finished: {} entries from {} pages in {} waves",
            self.builder.len(),
            self.stats.total_pages(),
            self.stats.waves
        );

        Ok(CrawlReport {
            sitemap: self.builder.finish(),
            statistics: self.stats,
        })
    }

    /// Fans one batch out to workers and commits results as they land
    ///
    /// Returns `false` if the deadline expired before the wave finished.
    async fn run_wave(
        &mut self,
        batch: Vec<Url>,
        deadline: Option<Instant>,
    ) -> Result<bool, CartographerError> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for url in batch {
            let ctx = Arc::clone(&self.ctx);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                process_url(ctx, url).await
            });
        }

        self.transition(CrawlState::Draining)?;

        loop {
            let joined = match deadline {
                Some(at) => match tokio::time::timeout_at(at, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tasks.abort_all();
                        while tasks.join_next().await.is_some() {}
                        return Ok(false);
                    }
                },
                None => tasks.join_next().await,
            };

            match joined {
                Some(Ok(report)) => self.commit(report),
                Some(Err(e)) => {
                    tracing::error!("Crawl worker failed: {}", e);
                    self.stats.record_page(PageState::FetchFailed);
                }
                None => return Ok(true),
            }
        }
    }

    /// Applies one worker's result to the sitemap and statistics
    fn commit(&mut self, report: PageReport) {
        let PageReport { url, result } = report;

        let processed = match result {
            Ok(processed) => processed,
            Err(e) => {
                let state = match e {
                    CartographerError::Parse { .. } => PageState::ParseFailed,
                    _ => PageState::FetchFailed,
                };
                tracing::warn!("Dropping {}: {}", url, e);
                self.stats.record_page(state);
                return;
            }
        };

        let ProcessedPage { verdict, links } = processed;
        self.stats.links_enqueued += links.enqueued;
        self.stats.links_rejected += links.rejected;
        self.stats.links_excluded += links.excluded;

        let state = match verdict.entry {
            Some(entry) => {
                let loc = entry.loc.clone();
                let images = entry.images.len();
                if self.builder.commit(entry) {
                    tracing::info!("Included {} ({} images)", loc, images);
                    self.stats.images_included += images as u64;
                    self.stats.images_skipped += verdict.images_skipped as u64;
                    PageState::Included
                } else {
                    tracing::debug!("Skipping {}: canonical {} already has an entry", url, loc);
                    PageState::Duplicate
                }
            }
            None => verdict.state,
        };

        self.stats.record_page(state);
    }
}

/// Fetches, parses and evaluates one URL
async fn process_url<F: Fetcher>(ctx: Arc<CrawlContext<F>>, url: Url) -> PageReport {
    tracing::debug!("Processing URL: {}", url);
    let result = fetch_and_evaluate(&ctx, &url).await;
    PageReport { url, result }
}

async fn fetch_and_evaluate<F: Fetcher>(
    ctx: &CrawlContext<F>,
    url: &Url,
) -> Result<ProcessedPage, CartographerError> {
    let fetched = match ctx.fetcher.fetch(url).await {
        Ok(fetched) => fetched,
        Err(FetchError::Redirect { location, .. }) => {
            let mut links = LinkTally::default();
            discover_href(ctx, &location, url, url, &mut links);
            return Ok(ProcessedPage {
                verdict: PageVerdict::skipped(PageState::Redirected),
                links,
            });
        }
        Err(e) => return Err(e.into()),
    };
    let page = Page::from_response(fetched)?;

    let verdict = ctx.policy.evaluate(&page, &ctx.normalizer);

    let links = if ctx.honor_nofollow && page.is_nofollow() {
        tracing::debug!("Not following links on nofollow page {}", url);
        LinkTally::default()
    } else {
        discover_links(ctx, &page)
    };

    Ok(ProcessedPage { verdict, links })
}

/// Normalizes every outbound href and enqueues the survivors
fn discover_links<F>(ctx: &CrawlContext<F>, page: &Page) -> LinkTally {
    let mut tally = LinkTally::default();

    for href in page.links() {
        discover_href(ctx, href, page.base_url(), page.url(), &mut tally);
    }

    tally
}

/// Normalizes one href found on (or redirected to from) `source`
///
/// Off-domain targets are rejected here, so a redirect leaving the site is
/// never fetched.
fn discover_href<F>(
    ctx: &CrawlContext<F>,
    href: &str,
    base: &Url,
    source: &Url,
    tally: &mut LinkTally,
) {
    let link = match ctx.normalizer.normalize(href, base) {
        Ok(link) => link,
        Err(e) => {
            tracing::warn!("Dropping link '{}' on {}: {}", href, source, e);
            tally.rejected += 1;
            return;
        }
    };

    if let Some(pattern) = ctx.policy.exclusions().matching_pattern(link.as_str()) {
        tracing::debug!("Link {} excluded by pattern '{}'", link, pattern);
        tally.excluded += 1;
        return;
    }

    if ctx.frontier.enqueue(link) {
        tally.enqueued += 1;
    }
}
