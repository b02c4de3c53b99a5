//! HTML page extraction
//!
//! This module turns a fetched response into a [`Page`], exposing exactly
//! what the inclusion policy and link discovery need:
//! - The canonical URL (`<link rel="canonical">`)
//! - Robots directives (`<meta name="robots">`)
//! - Raw outbound hrefs (`<a href>`)
//! - Image sources with captions (`<img src title alt>`)

use crate::crawler::fetcher::FetchedPage;
use crate::CartographerError;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// An `<img>` reference found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The `src` attribute, if present
    pub src: Option<String>,

    /// The `title` attribute, falling back to `alt`
    pub caption: Option<String>,
}

/// A fetched and parsed page
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    base_url: Url,
    canonical: Option<String>,
    robots: BTreeSet<String>,
    links: Vec<String>,
    images: Vec<ImageRef>,
}

impl Page {
    /// Builds a page from a fetch result
    ///
    /// A response that declares a non-HTML `Content-Type` is a parse error.
    /// Bodies that are not valid UTF-8 are decoded lossily.
    pub fn from_response(fetched: FetchedPage) -> Result<Self, CartographerError> {
        if let Some(content_type) = &fetched.content_type {
            if !is_html_content_type(content_type) {
                return Err(CartographerError::Parse {
                    url: fetched.url.to_string(),
                    message: format!("Expected HTML, got {}", content_type),
                });
            }
        }

        let html = String::from_utf8_lossy(&fetched.body);
        let base_url = fetched.url.clone();
        Ok(Self::parse(fetched.url, base_url, &html))
    }

    /// Parses HTML content fetched from `url`
    ///
    /// `base_url` is what relative hrefs and image sources resolve against.
    ///
    /// # Example
    ///
    /// ```
    /// use site_cartographer::crawler::Page;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/").unwrap();
    /// let html = r#"<html><head><meta name="robots" content="NOINDEX, follow"></head>
    ///     <body><a href="/about">About</a></body></html>"#;
    /// let page = Page::parse(url.clone(), url, html);
    /// assert!(page.is_noindex());
    /// assert_eq!(page.links(), &["/about".to_string()]);
    /// ```
    pub fn parse(url: Url, base_url: Url, html: &str) -> Self {
        let document = Html::parse_document(html);

        Self {
            canonical: extract_canonical(&document),
            robots: extract_robots(&document),
            links: extract_links(&document),
            images: extract_images(&document),
            url,
            base_url,
        }
    }

    /// The URL this page was requested as
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL relative hrefs on this page resolve against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The declared canonical href, or the requested URL if none is declared
    pub fn canonical_url(&self) -> &str {
        self.canonical.as_deref().unwrap_or(self.url.as_str())
    }

    /// The raw canonical href, if the page declares one
    pub fn canonical_href(&self) -> Option<&str> {
        self.canonical.as_deref()
    }

    /// Lower-cased robots meta tokens; empty if the tag is absent
    pub fn robots_directives(&self) -> &BTreeSet<String> {
        &self.robots
    }

    pub fn has_robots_directive(&self, directive: &str) -> bool {
        self.robots.contains(&directive.to_ascii_lowercase())
    }

    pub fn is_noindex(&self) -> bool {
        self.has_robots_directive("noindex")
    }

    pub fn is_nofollow(&self) -> bool {
        self.has_robots_directive("nofollow")
    }

    /// Raw `href` values of anchors, in document order
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// `<img>` references, in document order
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}

/// Returns the value of `name`, treating empty or whitespace-only values as absent
fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Extracts the first `<link rel="canonical">` href (rel matched case-insensitively)
fn extract_canonical(document: &Html) -> Option<String> {
    let selector = Selector::parse("link[rel][href]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|element| non_empty_attr(&element, "href"))
        .map(str::to_string)
}

/// Extracts the tokens of the first `<meta name="robots">` content attribute
fn extract_robots(document: &Html) -> BTreeSet<String> {
    let mut directives = BTreeSet::new();

    let Ok(selector) = Selector::parse("meta[name]") else {
        return directives;
    };

    let robots = document.select(&selector).find(|element| {
        element
            .value()
            .attr("name")
            .is_some_and(|name| name.trim().eq_ignore_ascii_case("robots"))
    });

    if let Some(content) = robots.and_then(|element| element.value().attr("content")) {
        directives.extend(
            content
                .split(',')
                .map(|token| token.trim().to_ascii_lowercase())
                .filter(|token| !token.is_empty()),
        );
    }

    directives
}

/// Extracts raw hrefs from anchors; anchors without an href are skipped
fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = non_empty_attr(&element, "href") {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Extracts image sources with their captions (`title`, then `alt`)
fn extract_images(document: &Html) -> Vec<ImageRef> {
    let mut images = Vec::new();

    if let Ok(img_selector) = Selector::parse("img") {
        for element in document.select(&img_selector) {
            let caption = non_empty_attr(&element, "title")
                .or_else(|| non_empty_attr(&element, "alt"))
                .map(str::to_string);

            images.push(ImageRef {
                src: element.value().attr("src").map(str::to_string),
                caption,
            });
        }
    }

    images
}
