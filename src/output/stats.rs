//! Crawl statistics
//!
//! The scheduler records every page outcome and link decision here; the
//! binary prints the summary once the sitemap has been written.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Counters collected over one crawl
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the scheduler left `Idle`
    pub started_at: DateTime<Utc>,

    /// When the scheduler reached `Done`
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of waves dispatched
    pub waves: u64,

    /// Count of fetched pages by outcome
    pub pages_by_state: HashMap<PageState, u64>,

    /// Links newly added to the frontier
    pub links_enqueued: u64,

    /// Links dropped by normalization (fragment-only, off-domain, bad scheme)
    pub links_rejected: u64,

    /// Links dropped by the exclusion rules
    pub links_excluded: u64,

    /// Image children written to sitemap entries
    pub images_included: u64,

    /// Images dropped by the exclusion rules or for lacking a source
    pub images_skipped: u64,

    /// Whether the crawl was cut short by its deadline
    pub deadline_hit: bool,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            waves: 0,
            pages_by_state: HashMap::new(),
            links_enqueued: 0,
            links_rejected: 0,
            links_excluded: 0,
            images_included: 0,
            images_skipped: 0,
            deadline_hit: false,
        }
    }

    pub fn record_page(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn pages_in_state(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Total pages that reached a terminal outcome
    pub fn total_pages(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Elapsed wall time in seconds, if the crawl has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the statistics as a plain-text report
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        let _ = writeln!(out, "  Finished: {}", finished.to_rfc3339());
    }
    if let Some(secs) = stats.duration_seconds() {
        let _ = writeln!(out, "  Duration: {}s", secs);
    }
    let _ = writeln!(out, "  Waves: {}", stats.waves);
    let _ = writeln!(out, "  Pages fetched: {}", stats.total_pages());
    if stats.deadline_hit {
        let _ = writeln!(out, "  Deadline reached; in-flight pages were abandoned");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Pages by State:");
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let total = stats.total_pages();
    for (state, count) in state_counts {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {}: {} ({:.1}%)", state, count, percentage);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Links:");
    let _ = writeln!(out, "  Enqueued: {}", stats.links_enqueued);
    let _ = writeln!(out, "  Rejected: {}", stats.links_rejected);
    let _ = writeln!(out, "  Excluded: {}", stats.links_excluded);
    let _ = writeln!(out);

    let _ = writeln!(out, "Images:");
    let _ = writeln!(out, "  Included: {}", stats.images_included);
    let _ = writeln!(out, "  Skipped: {}", stats.images_skipped);

    out
}

/// Prints statistics to stderr so they never mix with a sitemap on stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    eprint!("{}", format_statistics(stats));
}
