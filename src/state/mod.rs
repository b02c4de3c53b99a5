//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: The terminal outcome of one fetched URL (included, noindex, failed, ...)
//! - `CrawlState`: The scheduler's state machine (idle, running, draining, done)

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageState;
