use super::domain::extract_authority;
use super::Protocol;
use crate::UrlError;
use url::Url;

/// Normalizes a raw href into an absolute, fragment-free URL in `protocol`
///
/// # Normalization Steps
///
/// 1. Strip everything from the first `#` onward; a fragment-only href is rejected
/// 2. Scheme-relative hrefs (`//host/path`) get `protocol:` prefixed
/// 3. Absolute `http:`/`https:` hrefs are parsed as-is
/// 4. Anything else is resolved relative to `base`
/// 5. Reject results whose scheme is not http/https
/// 6. Coerce the scheme to `protocol`
///
/// The same-domain check lives in [`UrlNormalizer`], which wraps this function.
///
/// # Arguments
///
/// * `raw` - The href exactly as it appeared in the page
/// * `base` - The URL of the page the href was found on
/// * `protocol` - The crawl's target protocol
///
/// # Examples
///
/// ```
/// use site_cartographer::url::{normalize_url, Protocol};
/// use url::Url;
///
/// let base = Url::parse("https://foo.com/").unwrap();
/// let url = normalize_url("https://foo.com/bar#baz", &base, Protocol::Http).unwrap();
/// assert_eq!(url.as_str(), "http://foo.com/bar");
/// ```
pub fn normalize_url(raw: &str, base: &Url, protocol: Protocol) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    let href = strip_fragment(trimmed);

    if href.is_empty() {
        return Err(if trimmed.starts_with('#') {
            UrlError::FragmentOnly(raw.to_string())
        } else {
            UrlError::Empty
        });
    }

    let mut url = if let Some(rest) = href.strip_prefix("//") {
        parse_absolute(&format!("{}://{}", protocol, rest))?
    } else if has_http_scheme(href) {
        parse_absolute(href)?
    } else {
        base.join(href).map_err(|e| UrlError::Parse {
            url: href.to_string(),
            message: e.to_string(),
        })?
    };

    if Protocol::from_scheme(url.scheme()).is_none() {
        return Err(UrlError::InvalidScheme(url.to_string()));
    }

    coerce_protocol(&mut url, protocol)?;
    url.set_fragment(None);

    Ok(url)
}

/// Normalizes the seed URL of a crawl
///
/// Unlike [`normalize_url`] there is no base to resolve against, so the seed
/// must already be an absolute http/https URL.
pub fn normalize_seed(seed: &str, protocol: Protocol) -> Result<Url, UrlError> {
    let href = strip_fragment(seed.trim());
    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut url = parse_absolute(href)?;
    if Protocol::from_scheme(url.scheme()).is_none() {
        return Err(UrlError::InvalidScheme(url.to_string()));
    }

    coerce_protocol(&mut url, protocol)?;
    Ok(url)
}

/// Removes the fragment (`#...`) from an href
///
/// A fragment-only href such as `#top` becomes an empty string.
pub fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map_or(href, |(before, _)| before)
}

/// Normalizes hrefs for one crawl, rejecting anything off the crawl's domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlNormalizer {
    protocol: Protocol,
    authority: String,
}

impl UrlNormalizer {
    /// Creates a normalizer bound to the seed URL's authority
    pub fn new(seed: &Url, protocol: Protocol) -> Result<Self, UrlError> {
        let authority = extract_authority(seed).ok_or_else(|| UrlError::Parse {
            url: seed.to_string(),
            message: "URL has no host".to_string(),
        })?;

        Ok(Self {
            protocol,
            authority,
        })
    }

    /// Normalizes `raw` against `base` and requires it to stay on the crawl's domain
    pub fn normalize(&self, raw: &str, base: &Url) -> Result<Url, UrlError> {
        let url = normalize_url(raw, base, self.protocol)?;

        if extract_authority(&url).as_deref() != Some(self.authority.as_str()) {
            return Err(UrlError::OffDomain(url.to_string()));
        }

        Ok(url)
    }

    /// The `host[:port]` every URL must match
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

fn has_http_scheme(href: &str) -> bool {
    let lower = href
        .get(..6)
        .unwrap_or(href)
        .to_ascii_lowercase();
    lower.starts_with("http:") || lower.starts_with("https:")
}

fn parse_absolute(href: &str) -> Result<Url, UrlError> {
    Url::parse(href).map_err(|e| UrlError::Parse {
        url: href.to_string(),
        message: e.to_string(),
    })
}

fn coerce_protocol(url: &mut Url, protocol: Protocol) -> Result<(), UrlError> {
    if url.scheme() != protocol.as_str() {
        url.set_scheme(protocol.as_str())
            .map_err(|()| UrlError::InvalidScheme(url.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://foo.com/dir/page.html").unwrap()
    }

    #[test]
    fn test_strip_fragment() {
        assert_eq!(
            strip_fragment("https://foo.com/bar.html#baz"),
            "https://foo.com/bar.html"
        );
        assert_eq!(strip_fragment("#baz"), "");
        assert_eq!(
            strip_fragment("https://foo.com/bar.html"),
            "https://foo.com/bar.html"
        );
    }

    #[test]
    fn test_https_to_http_drops_fragment() {
        let url = normalize_url("https://foo.com/bar#baz", &base(), Protocol::Http).unwrap();
        assert_eq!(url.as_str(), "http://foo.com/bar");
    }

    #[test]
    fn test_http_to_https() {
        let url = normalize_url("http://foo.com/bar", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/bar");
    }

    #[test]
    fn test_same_protocol_unchanged() {
        let url = normalize_url("http://foo.com/bar", &base(), Protocol::Http).unwrap();
        assert_eq!(url.as_str(), "http://foo.com/bar");

        let url = normalize_url("https://foo.com/bar", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/bar");
    }

    #[test]
    fn test_scheme_relative_empty_path_becomes_root() {
        // An empty path normalizes to the root path
        let url = normalize_url("//foo.com", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/");

        let url = normalize_url("//foo.com/a", &base(), Protocol::Http).unwrap();
        assert_eq!(url.as_str(), "http://foo.com/a");
    }

    #[test]
    fn test_uppercase_scheme_is_coerced() {
        let url = normalize_url("HTTP://FOO.com/Bar", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/Bar");
    }

    #[test]
    fn test_fragment_only_rejected() {
        assert_eq!(
            normalize_url("#baz", &base(), Protocol::Https).unwrap_err(),
            UrlError::FragmentOnly("#baz".to_string())
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            normalize_url("   ", &base(), Protocol::Https).unwrap_err(),
            UrlError::Empty
        );
    }

    #[test]
    fn test_relative_resolution() {
        let url = normalize_url("/about", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/about");

        let url = normalize_url("other.html", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/dir/other.html");

        let url = normalize_url("../up.html?x=1#top", &base(), Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/up.html?x=1");
    }

    #[test]
    fn test_relative_resolution_coerces_base_protocol() {
        let http_base = Url::parse("http://foo.com/").unwrap();
        let url = normalize_url("/a", &http_base, Protocol::Https).unwrap();
        assert_eq!(url.as_str(), "https://foo.com/a");
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        for href in [
            "mailto:someone@foo.com",
            "javascript:void(0)",
            "tel:+15555550100",
            "ftp://foo.com/file",
        ] {
            let err = normalize_url(href, &base(), Protocol::Https).unwrap_err();
            assert!(
                matches!(err, UrlError::InvalidScheme(_)),
                "{} gave {:?}",
                href,
                err
            );
        }
    }

    #[test]
    fn test_malformed_absolute_rejected() {
        let err = normalize_url("http://[::1", &base(), Protocol::Https).unwrap_err();
        assert!(matches!(err, UrlError::Parse { .. }));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let hrefs = [
            "https://foo.com/bar#baz",
            "//foo.com",
            "/a/b/../c?q=1",
            "page.html#frag",
            "HTTP://foo.com/X",
            "http://foo.com:8080/port",
        ];

        for protocol in [Protocol::Http, Protocol::Https] {
            for href in hrefs {
                let once = normalize_url(href, &base(), protocol).unwrap();
                let twice = normalize_url(once.as_str(), &once, protocol).unwrap();
                assert_eq!(once, twice, "not idempotent for {}", href);
            }
        }
    }

    #[test]
    fn test_normalize_seed() {
        let seed = normalize_seed("http://foo.com/start#x", Protocol::Https).unwrap();
        assert_eq!(seed.as_str(), "https://foo.com/start");

        assert!(matches!(
            normalize_seed("foo.com", Protocol::Https).unwrap_err(),
            UrlError::Parse { .. }
        ));
        assert!(matches!(
            normalize_seed("ftp://foo.com", Protocol::Https).unwrap_err(),
            UrlError::InvalidScheme(_)
        ));
        assert_eq!(
            normalize_seed("", Protocol::Https).unwrap_err(),
            UrlError::Empty
        );
    }

    #[test]
    fn test_normalizer_rejects_off_domain() {
        let seed = Url::parse("https://foo.com/").unwrap();
        let normalizer = UrlNormalizer::new(&seed, Protocol::Https).unwrap();

        assert!(normalizer.normalize("/inside", &seed).is_ok());
        assert!(normalizer.normalize("http://foo.com/inside", &seed).is_ok());
        assert!(matches!(
            normalizer.normalize("https://bar.com/", &seed).unwrap_err(),
            UrlError::OffDomain(_)
        ));
        assert!(matches!(
            normalizer.normalize("https://sub.foo.com/", &seed).unwrap_err(),
            UrlError::OffDomain(_)
        ));
        assert!(matches!(
            normalizer.normalize("//foo.com:8443/", &seed).unwrap_err(),
            UrlError::OffDomain(_)
        ));
    }

    #[test]
    fn test_normalizer_keeps_explicit_port() {
        let seed = Url::parse("http://127.0.0.1:4000/").unwrap();
        let normalizer = UrlNormalizer::new(&seed, Protocol::Http).unwrap();

        assert_eq!(normalizer.authority(), "127.0.0.1:4000");
        let url = normalizer.normalize("/a", &seed).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4000/a");
        assert!(normalizer.normalize("http://127.0.0.1/a", &seed).is_err());
    }
}
