use crate::sitemap::{Sitemap, SitemapEntry};
use std::collections::HashSet;
use url::Url;

/// Accumulates accepted entries in commit order
///
/// The builder is owned by the scheduler; workers only produce entries and
/// the scheduler commits them one page at a time, so an entry is either
/// fully present or absent.
#[derive(Debug, Default)]
pub struct SitemapBuilder {
    include_images: bool,
    entries: Vec<SitemapEntry>,
    locations: HashSet<Url>,
}

impl SitemapBuilder {
    pub fn new(include_images: bool) -> Self {
        Self {
            include_images,
            ..Self::default()
        }
    }

    /// Commits one page's entry
    ///
    /// # Returns
    ///
    /// `false` if an entry with the same location was already committed
    /// (two pages declaring the same canonical URL); the entry is dropped.
    pub fn commit(&mut self, mut entry: SitemapEntry) -> bool {
        if !self.locations.insert(entry.loc.clone()) {
            return false;
        }

        if !self.include_images {
            entry.images.clear();
        }

        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the builder and returns the finished sitemap
    pub fn finish(self) -> Sitemap {
        Sitemap::new(self.entries, self.include_images)
    }
}
