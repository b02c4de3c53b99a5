//! URL handling module for Site-Cartographer
//!
//! This module provides href normalization, the crawl protocol, authority
//! extraction for same-domain checks, and substring exclusion rules.

mod domain;
mod matcher;
mod normalize;

use crate::UrlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export main functions
pub use domain::{extract_authority, extract_domain};
pub use matcher::ExclusionRules;
pub use normalize::{normalize_seed, normalize_url, strip_fragment, UrlNormalizer};

/// The single scheme every crawled URL is coerced to
///
/// A crawl never counts the same page twice under `http` and `https`; all
/// discovered links are rewritten to this protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    /// Returns the URL scheme for this protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Returns the protocol matching a URL scheme, if it is http or https
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("http") {
            Some(Self::Http)
        } else if scheme.eq_ignore_ascii_case("https") {
            Some(Self::Https)
        } else {
            None
        }
    }
}

impl FromStr for Protocol {
    type Err = UrlError;

    /// Parses `http`/`https`, case-insensitively, with or without a trailing `://`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let scheme = trimmed
            .strip_suffix("://")
            .or_else(|| trimmed.strip_suffix(':'))
            .unwrap_or(trimmed);

        Self::from_scheme(scheme).ok_or_else(|| UrlError::InvalidProtocol(s.to_string()))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
