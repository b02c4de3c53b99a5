//! Configuration module for Site-Cartographer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_cartographer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cartographer.toml")).unwrap();
//! println!("Crawling from: {}", config.crawler.seed_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, read_config};
pub use validation::{validate as validate_config, MAX_WORKERS};
