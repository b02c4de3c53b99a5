//! Output module for rendering crawl results
//!
//! This module handles:
//! - Serializing the finished sitemap as XML
//! - Reporting crawl statistics

pub mod stats;
mod xml;

pub use stats::{format_statistics, print_statistics, CrawlStatistics};
pub use xml::{to_xml_string, write_sitemap, write_sitemap_file, IMAGE_NAMESPACE, SITEMAP_NAMESPACE};

use thiserror::Error;

/// Sitemap serialization errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to write sitemap: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sitemap output: {0}")]
    Format(String),
}

/// Result type alias for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;
