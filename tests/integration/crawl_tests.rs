//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_cartographer::config::Config;
use site_cartographer::output::{to_xml_string, write_sitemap_file, IMAGE_NAMESPACE};
use site_cartographer::{crawl, CartographerError, ConfigError, PageState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration seeded at the mock server's root
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::for_seed(format!("{}/", server.uri()));
    config.crawler.workers = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

/// Serves `html` at `route` and expects exactly one request for it
async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

fn sorted_locations(sitemap: &site_cartographer::Sitemap) -> Vec<String> {
    let mut locs: Vec<String> = sitemap.locations().map(String::from).collect();
    locs.sort();
    locs
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/about">About</a>
            <a href="blog">Blog</a>
            <a href="https://other.example/">Elsewhere</a>
            <a href="mailto:hello@example.com">Mail</a>
            <img src="/img/logo.png" alt="Logo">
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/about", r#"<a href="/">Home</a>"#).await;
    mount_page(
        &server,
        "/blog",
        r#"<a href="/blog/post-1">Post</a><a href="/about#team">Team</a>"#,
    )
    .await;
    mount_page(&server, "/blog/post-1", r#"<a href="/blog">Back</a>"#).await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![
            format!("{}/", base),
            format!("{}/about", base),
            format!("{}/blog", base),
            format!("{}/blog/post-1", base),
        ]
    );
    assert_eq!(report.statistics.pages_in_state(PageState::Included), 4);
    assert_eq!(report.statistics.links_rejected, 2);
    assert_eq!(report.statistics.images_included, 1);

    let xml = to_xml_string(&report.sitemap).unwrap();
    assert!(xml.contains(&format!("<loc>{}/blog/post-1</loc>", base)));
    assert!(xml.contains(&format!("<image:loc>{}/img/logo.png</image:loc>", base)));
    assert!(xml.contains("<image:caption>Logo</image:caption>"));
}

#[tokio::test]
async fn test_cycle_produces_two_entries() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/b">B</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/">A</a>"#).await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![format!("{}/", base), format!("{}/b", base)]
    );
}

#[tokio::test]
async fn test_noindex_page_excluded_but_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><meta name="robots" content="NOINDEX, nofollow"></head>
            <body><a href="/public">Public</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/public", "<p>public</p>").await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![format!("{}/public", base)]
    );
    assert_eq!(report.statistics.pages_in_state(PageState::Noindex), 1);
}

#[tokio::test]
async fn test_ignore_noindex_includes_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><meta name="robots" content="NOINDEX, nofollow"></head></html>"#,
    )
    .await;

    let mut config = create_test_config(&server);
    config.crawler.ignore_noindex = true;
    let report = crawl(&config).await.unwrap();

    assert_eq!(sorted_locations(&report.sitemap), vec![format!("{}/", base)]);
}

#[tokio::test]
async fn test_excluded_image_omitted_page_kept() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<img src="/tracking/pixel.gif"><img src="/photos/cat.jpg" title="Cat" alt="A cat">"#,
    )
    .await;

    let mut config = create_test_config(&server);
    config.crawler.exclude = vec!["/tracking/".to_string()];
    let report = crawl(&config).await.unwrap();

    let entries = report.sitemap.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].loc.as_str(), format!("{}/", base));
    assert_eq!(entries[0].images.len(), 1);
    assert_eq!(
        entries[0].images[0].loc.as_str(),
        format!("{}/photos/cat.jpg", base)
    );
    assert_eq!(entries[0].images[0].caption.as_deref(), Some("Cat"));
}

#[tokio::test]
async fn test_excluded_pages_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/cart/checkout">Cart</a><a href="/shop">Shop</a>"#,
    )
    .await;
    mount_page(&server, "/shop", "<p>shop</p>").await;
    Mock::given(method("GET"))
        .and(path("/cart/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>cart</p>", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.crawler.exclude = vec!["/cart".to_string()];
    let report = crawl(&config).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![format!("{}/", base), format!("{}/shop", base)]
    );
}

#[tokio::test]
async fn test_images_disabled_omits_namespace() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<img src="/a.png" title="A">"#).await;

    let mut config = create_test_config(&server);
    config.crawler.include_images = false;
    let report = crawl(&config).await.unwrap();

    let xml = to_xml_string(&report.sitemap).unwrap();
    assert!(!xml.contains(IMAGE_NAMESPACE));
    assert!(!xml.contains("image:"));
    assert_eq!(report.sitemap.image_count(), 0);
}

#[tokio::test]
async fn test_broken_page_does_not_halt_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/gone">Gone</a><a href="/error">Error</a><a href="/ok">OK</a>"#,
    )
    .await;
    mount_page(&server, "/ok", r#"<a href="/deeper">Deeper</a>"#).await;
    mount_page(&server, "/deeper", "<p>deep</p>").await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![
            format!("{}/", base),
            format!("{}/deeper", base),
            format!("{}/ok", base),
        ]
    );
    assert_eq!(report.statistics.pages_in_state(PageState::FetchFailed), 2);
}

#[tokio::test]
async fn test_canonical_url_used_for_entry() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/print/article">Print</a>"#).await;
    mount_page(
        &server,
        "/print/article",
        r#"<head><link rel="canonical" href="/article"></head>"#,
    )
    .await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![format!("{}/", base), format!("{}/article", base)]
    );
}

#[tokio::test]
async fn test_non_html_response_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/report.pdf">Report</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(sorted_locations(&report.sitemap), vec![format!("{}/", base)]);
    assert_eq!(report.statistics.pages_in_state(PageState::ParseFailed), 1);
}

#[tokio::test]
async fn test_off_site_redirect_not_followed() {
    let server = MockServer::start().await;
    let partner = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/login">Sign in</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/sso", partner.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sso"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><img src="/partner.png" alt="Partner"></body></html>"#,
            "text/html",
        ))
        .expect(0)
        .mount(&partner)
        .await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(sorted_locations(&report.sitemap), vec![format!("{}/", base)]);
    assert_eq!(report.statistics.pages_in_state(PageState::Redirected), 1);
    assert_eq!(report.statistics.images_included, 0);
    assert!(report
        .sitemap
        .entries()
        .iter()
        .all(|entry| entry.images.is_empty()));
}

#[tokio::test]
async fn test_same_site_redirect_fetches_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/old">Moved</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/new", r#"<a href="/">Home</a>"#).await;

    let report = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(
        sorted_locations(&report.sitemap),
        vec![format!("{}/", base), format!("{}/new", base)]
    );
    assert_eq!(report.statistics.pages_in_state(PageState::Redirected), 1);
}

#[tokio::test]
async fn test_sitemap_written_to_file() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/about">About</a>"#).await;
    mount_page(&server, "/about", "<p>about</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let sitemap_path = dir.path().join("sitemap.xml");

    let mut config = create_test_config(&server);
    config.output.sitemap_path = sitemap_path.to_string_lossy().into_owned();

    let report = crawl(&config).await.unwrap();
    write_sitemap_file(&report.sitemap, &config.output).unwrap();

    let written = std::fs::read_to_string(&sitemap_path).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.contains("http://www.sitemaps.org/schemas/sitemap/0.9"));
    assert!(written.contains(&format!("<loc>{}/about</loc>", base)));
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let config = Config::for_seed("ftp://example.com/");

    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, CartographerError::Config(ConfigError::InvalidUrl(_))));
}
