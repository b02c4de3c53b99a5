use crate::url::{ExclusionRules, Protocol};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for Site-Cartographer
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Creates a configuration with defaults for everything but the seed URL
    pub fn for_seed(seed_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_url: seed_url.into(),
                ..CrawlerConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlerConfig {
    /// Page the crawl starts from
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    /// Target protocol; defaults to the seed URL's scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Maximum number of concurrent page fetches within a wave
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Record `<img>` references as image sitemap entries
    #[serde(rename = "include-images", default = "default_true")]
    pub include_images: bool,

    /// Include pages even when they carry a `noindex` robots directive
    #[serde(rename = "ignore-noindex", default)]
    pub ignore_noindex: bool,

    /// Stop following links on pages with a `nofollow` robots directive
    #[serde(rename = "honor-nofollow", default)]
    pub honor_nofollow: bool,

    /// Substring patterns excluding page URLs and image sources
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Hard deadline for the whole crawl (seconds)
    #[serde(rename = "deadline-secs", default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            protocol: None,
            workers: default_workers(),
            include_images: true,
            ignore_noindex: false,
            honor_nofollow: false,
            exclude: Vec::new(),
            deadline_secs: None,
        }
    }
}

impl CrawlerConfig {
    /// Resolves the target protocol
    ///
    /// An explicit `protocol` wins; otherwise the seed URL's scheme is used.
    pub fn target_protocol(&self) -> Result<Protocol, ConfigError> {
        match &self.protocol {
            Some(protocol) => protocol
                .parse()
                .map_err(|_| ConfigError::InvalidProtocol(protocol.clone())),
            None => {
                let scheme = self.seed_url.trim().split_once(':').map(|(s, _)| s);
                scheme.and_then(Protocol::from_scheme).ok_or_else(|| {
                    ConfigError::InvalidUrl(format!(
                        "Seed URL '{}' must use the http or https scheme",
                        self.seed_url
                    ))
                })
            }
        }
    }

    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::new(self.exclude.iter().cloned())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default, skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn user_agent_string(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where the sitemap is written; `-` means stdout
    #[serde(rename = "sitemap-path", default = "default_sitemap_path")]
    pub sitemap_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: default_sitemap_path(),
        }
    }
}

impl OutputConfig {
    pub fn writes_to_stdout(&self) -> bool {
        self.sitemap_path == "-"
    }
}

fn default_workers() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_crawler_name() -> String {
    "SiteCartographer".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_sitemap_path() -> String {
    "sitemap.xml".to_string()
}
