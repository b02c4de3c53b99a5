use crate::crawler::Page;
use crate::sitemap::{ImageEntry, SitemapEntry};
use crate::state::PageState;
use crate::url::{ExclusionRules, Protocol, UrlNormalizer};
use url::Url;

/// The decision for one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVerdict {
    /// `Included` when `entry` is set, otherwise why the page was left out
    pub state: PageState,

    /// The entry to commit, if the page was accepted
    pub entry: Option<SitemapEntry>,

    /// Images dropped by the exclusion rules or for having no usable source
    pub images_skipped: usize,
}

impl PageVerdict {
    /// A verdict that produces no entry
    pub fn skipped(state: PageState) -> Self {
        Self {
            state,
            entry: None,
            images_skipped: 0,
        }
    }
}

/// Decides which pages and images go into the sitemap
///
/// Evaluation is pure and runs inside crawl workers; only the resulting
/// entry is handed back for commit.
#[derive(Debug, Clone, Default)]
pub struct InclusionPolicy {
    include_images: bool,
    ignore_noindex: bool,
    exclusions: ExclusionRules,
}

impl InclusionPolicy {
    pub fn new(include_images: bool, ignore_noindex: bool, exclusions: ExclusionRules) -> Self {
        Self {
            include_images,
            ignore_noindex,
            exclusions,
        }
    }

    pub fn exclusions(&self) -> &ExclusionRules {
        &self.exclusions
    }

    /// Evaluates a fetched page
    ///
    /// # Policy
    ///
    /// 1. `noindex` pages are dropped (unless noindex is ignored); their
    ///    links are still followed by the caller, their images are not recorded
    /// 2. The entry is keyed on the canonical URL; a canonical href that fails
    ///    normalization falls back to the requested URL
    /// 3. A canonical URL matching an exclusion pattern drops the page
    /// 4. Images with an empty source, or a source matching an exclusion
    ///    pattern, are skipped individually; patterns are matched against the
    ///    resolved absolute image URL, not the raw `src` attribute
    pub fn evaluate(&self, page: &Page, normalizer: &UrlNormalizer) -> PageVerdict {
        if !self.ignore_noindex && page.is_noindex() {
            tracing::debug!("Page {} is noindex, leaving it out", page.url());
            return PageVerdict::skipped(PageState::Noindex);
        }

        let loc = resolve_canonical(page, normalizer);

        if let Some(pattern) = self.exclusions.matching_pattern(loc.as_str()) {
            tracing::debug!("Page {} excluded by pattern '{}'", loc, pattern);
            return PageVerdict::skipped(PageState::Excluded);
        }

        let mut entry = SitemapEntry::new(loc);
        let mut images_skipped = 0;

        if self.include_images {
            for image in page.images() {
                match self.accept_image(page, image.src.as_deref()) {
                    Some(image_loc) => entry.images.push(ImageEntry {
                        loc: image_loc,
                        caption: image.caption.clone(),
                    }),
                    None => images_skipped += 1,
                }
            }
        }

        PageVerdict {
            state: PageState::Included,
            entry: Some(entry),
            images_skipped,
        }
    }

    /// Resolves an image source and applies the exclusion rules to it
    fn accept_image(&self, page: &Page, src: Option<&str>) -> Option<Url> {
        let src = src.map(str::trim).filter(|s| !s.is_empty())?;

        let resolved = match page.base_url().join(src) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping image '{}' on {}: {}", src, page.url(), e);
                return None;
            }
        };

        if Protocol::from_scheme(resolved.scheme()).is_none() {
            tracing::debug!("Skipping non-http image source on {}", page.url());
            return None;
        }

        if let Some(pattern) = self.exclusions.matching_pattern(resolved.as_str()) {
            tracing::debug!("Image {} excluded by pattern '{}'", resolved, pattern);
            return None;
        }

        Some(resolved)
    }
}

fn resolve_canonical(page: &Page, normalizer: &UrlNormalizer) -> Url {
    match normalizer.normalize(page.canonical_url(), page.base_url()) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(
                "Ignoring canonical URL '{}' on {}: {}",
                page.canonical_url(),
                page.url(),
                e
            );
            page.url().clone()
        }
    }
}
