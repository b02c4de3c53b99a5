/// Page outcome definitions for crawl statistics
///
/// Every URL drained from the frontier ends in exactly one of these states.
use std::fmt;

/// The outcome of fetching and evaluating one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success States =====
    /// Page passed the inclusion policy and has a sitemap entry
    Included,

    // ===== Skip States =====
    /// Page carries a `noindex` robots directive
    Noindex,

    /// Page's canonical URL matches an exclusion pattern
    Excluded,

    /// Page's canonical URL already has an entry
    Duplicate,

    /// Response was a redirect; its target was handed to link discovery
    Redirected,

    // ===== Error States =====
    /// Transport failure or non-success HTTP status
    FetchFailed,

    /// Body could not be treated as HTML
    ParseFailed,
}

impl PageState {
    /// Returns true if the page produced a sitemap entry
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Included)
    }

    /// Returns true if the page was fetched but deliberately left out
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::Noindex | Self::Excluded | Self::Duplicate | Self::Redirected
        )
    }

    /// Returns true if the page could not be fetched or parsed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::ParseFailed)
    }

    /// Short identifier used in logs and statistics output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Included => "included",
            Self::Noindex => "noindex",
            Self::Excluded => "excluded",
            Self::Duplicate => "duplicate",
            Self::Redirected => "redirected",
            Self::FetchFailed => "fetch_failed",
            Self::ParseFailed => "parse_failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Included,
            Self::Noindex,
            Self::Excluded,
            Self::Duplicate,
            Self::Redirected,
            Self::FetchFailed,
            Self::ParseFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
