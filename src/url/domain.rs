use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_cartographer::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the authority (`host[:port]`) that same-domain checks compare
///
/// The port is only included when it is explicit and not the scheme's
/// default, so `https://example.com:443/` and `https://example.com/` share an
/// authority.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_cartographer::url::extract_authority;
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("localhost:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let domain = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", domain, port),
        None => domain,
    })
}
