//! Sitemap model and builder
//!
//! This module holds the in-memory sitemap tree and the inclusion policy
//! that decides which fetched pages (and which of their images) go into it.

mod builder;
mod policy;

pub use builder::SitemapBuilder;
pub use policy::{InclusionPolicy, PageVerdict};

use url::Url;

/// An image child of a sitemap entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Absolute image URL
    pub loc: Url,

    /// Caption from the image's `title`, falling back to `alt`
    pub caption: Option<String>,
}

/// One accepted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// The page's canonical URL
    pub loc: Url,

    /// Images found on the page, in document order
    pub images: Vec<ImageEntry>,
}

impl SitemapEntry {
    pub fn new(loc: Url) -> Self {
        Self {
            loc,
            images: Vec::new(),
        }
    }
}

/// The finished sitemap, handed to the serializer once per crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sitemap {
    entries: Vec<SitemapEntry>,
    include_images: bool,
}

impl Sitemap {
    pub fn new(entries: Vec<SitemapEntry>, include_images: bool) -> Self {
        Self {
            entries,
            include_images,
        }
    }

    /// Entries in commit order
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    /// Whether the image namespace and image children are emitted
    pub fn include_images(&self) -> bool {
        self.include_images
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page locations in commit order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.loc.as_str())
    }

    /// Total number of image children across all entries
    pub fn image_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.images.len()).sum()
    }
}
