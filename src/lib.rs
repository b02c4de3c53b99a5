//! Site-Cartographer: a single-site sitemap generator
//!
//! This crate crawls one web site from a seed URL, follows every same-domain
//! hyperlink it can find, and renders the accepted pages (with their images)
//! as a search-engine sitemap.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Cartographer operations
#[derive(Debug, Error)]
pub enum CartographerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid crawl state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid protocol in config: {0}")]
    InvalidProtocol(String),
}

/// URL-specific errors
///
/// Every variant means the href is dropped; none of them stop a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Link is only a fragment: {0}")]
    FragmentOnly(String),

    #[error("Link is empty")]
    Empty,

    #[error("Failed to parse URL '{url}': {message}")]
    Parse { url: String, message: String },

    #[error("Not an http/https URL: {0}")]
    InvalidScheme(String),

    #[error("Protocol must be \"http\" or \"https\", got \"{0}\"")]
    InvalidProtocol(String),

    #[error("URL is outside the crawl domain: {0}")]
    OffDomain(String),
}

/// Page fetch errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// A 3xx response; redirects are never followed by the client
    #[error("HTTP {status} redirect from {url} to {location}")]
    Redirect {
        url: String,
        status: u16,
        location: String,
    },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Result type alias for Site-Cartographer operations
pub type Result<T> = std::result::Result<T, CartographerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport};
pub use sitemap::{ImageEntry, Sitemap, SitemapEntry};
pub use state::{CrawlState, PageState};
pub use crate::url::{normalize_url, ExclusionRules, Protocol, UrlNormalizer};
