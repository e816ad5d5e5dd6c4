//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and test the full walk
//! end-to-end, from HTTP fetch to CSV output.

use async_trait::async_trait;
use catalog_walker::config::{Config, ExhaustionPolicy};
use catalog_walker::crawler::{
    crawl, run_walk, CrawlSession, HttpFetcher, PageWalker, RenderError, RenderSettle, Renderer,
};
use catalog_walker::output::CsvSink;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a listing page in the layout the default selectors expect
fn listing(count_label: &str, hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<div class="card"><h3><a href="{}">part</a></h3></div>"#, href))
        .collect();
    format!(
        r#"<!DOCTYPE html><html><body>
        <div id="productlist-697e85dbef">
            <div><h4>{}</h4></div>
            <div><div class="facets"></div><div class="grid">{}</div></div>
        </div>
        </body></html>"#,
        count_label, items
    )
}

async fn mount_page(server: &MockServer, page: u32, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Creates a test configuration walking pages 1..=ceiling of the mock server
fn create_test_config(server: &MockServer, ceiling: u32, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawl.seed_url_template = format!("{}/listing?page={{page}}", server.uri());
    config.crawl.page_ceiling = ceiling;
    config.retry.delay_ms = 0;
    config.fetch.timeout_secs = 5;
    config.render.enabled = false;
    config.output.csv_path = dir.path().join("out.csv").display().to_string();
    config.output.cache_dir = Some(dir.path().join("cache").display().to_string());
    config
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// Renderer returning fixed links and recording the pages it was asked for
struct FixedRenderer {
    hrefs: Vec<String>,
    rendered: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Renderer for FixedRenderer {
    async fn render_links(
        &mut self,
        url: &Url,
        _selector: &str,
        _settle: &RenderSettle,
    ) -> Result<Vec<String>, RenderError> {
        self.rendered.lock().unwrap().push(url.to_string());
        Ok(self.hrefs.clone())
    }

    async fn shutdown(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_full_crawl_writes_csv() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, 200, listing("12 products", &["/p/1", "/p/2", "/p/3"])).await;
    mount_page(&server, 2, 200, listing("12 products", &["/p/4"])).await;

    let config = create_test_config(&server, 2, &dir);
    let csv_path = std::path::PathBuf::from(&config.output.csv_path);

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.records_emitted, 4);

    let header = std::fs::read_to_string(&csv_path).unwrap();
    assert!(header.starts_with("Product URL,Product Count,Category Name,Category URL\n"));

    let rows = read_rows(&csv_path);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][0], format!("{}/p/1", server.uri()));
    assert_eq!(rows[0][1], "12");
    assert_eq!(rows[0][2], "Solderless Terminals");
    assert_eq!(rows[3][0], format!("{}/p/4", server.uri()));
}

#[tokio::test]
async fn test_failing_page_is_retried_then_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, 200, listing("2 products", &["/p/a"])).await;
    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;
    mount_page(&server, 3, 200, listing("2 products", &["/p/c"])).await;

    let config = create_test_config(&server, 3, &dir);
    let csv_path = std::path::PathBuf::from(&config.output.csv_path);

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_exhausted, 1);
    assert_eq!(summary.requests_issued, 6);
    assert_eq!(summary.last_page, Some(3));

    let rows = read_rows(&csv_path);
    let urls: Vec<_> = rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(
        urls,
        vec![format!("{}/p/a", server.uri()), format!("{}/p/c", server.uri())]
    );
}

#[tokio::test]
async fn test_halt_policy_stops_at_failing_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, 200, listing("1 product", &["/p/a"])).await;
    mount_page(&server, 2, 500, String::new()).await;
    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing("1", &["/p/c"])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 3, &dir);
    config.crawl.on_exhausted = ExhaustionPolicy::Halt;

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.halted_at, Some(2));
    assert_eq!(summary.records_emitted, 1);
}

#[tokio::test]
async fn test_fallback_renders_empty_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, 200, listing("7 products", &[])).await;

    let config = create_test_config(&server, 1, &dir);
    let walker = PageWalker::from_config(&config, HttpFetcher::new(&config.fetch).unwrap()).unwrap();

    let rendered = Arc::new(Mutex::new(Vec::new()));
    let renderer = FixedRenderer {
        hrefs: vec!["/p/rendered".to_string()],
        rendered: Arc::clone(&rendered),
    };
    let session = CrawlSession::open(Box::new(renderer), RenderSettle::default());

    let csv_path = dir.path().join("fallback.csv");
    let mut sink = CsvSink::create(&csv_path).unwrap();
    let summary = run_walk(&walker, session, &mut sink).await.unwrap();

    assert_eq!(summary.fallbacks_recovered, 1);
    assert_eq!(
        *rendered.lock().unwrap(),
        vec![format!("{}/listing?page=1", server.uri())]
    );

    let rows = read_rows(&csv_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], format!("{}/p/rendered", server.uri()));
    assert_eq!(rows[0][1], "7");
}

#[tokio::test]
async fn test_empty_page_without_renderer_continues() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, 200, listing("0 products", &[])).await;
    mount_page(&server, 2, 200, listing("4 products", &["/p/x"])).await;

    let config = create_test_config(&server, 2, &dir);

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_fallback_empty, 1);
    assert_eq!(summary.pages_emitted, 1);
    assert_eq!(summary.records_emitted, 1);
}

#[tokio::test]
async fn test_fetched_pages_are_cached() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, 200, listing("1 product", &["/p/1"])).await;
    mount_page(&server, 2, 200, listing("1 product", &["/p/2"])).await;

    let config = create_test_config(&server, 2, &dir);
    crawl(config).await.expect("Crawl failed");

    let cached: Vec<_> = std::fs::read_dir(dir.path().join("cache"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(cached.len(), 2);
    assert!(cached.iter().all(|name| name.ends_with("_listing_page_1.html")
        || name.ends_with("_listing_page_2.html")));
}

#[cfg(feature = "chrome")]
#[tokio::test]
async fn test_failed_browser_launch_keeps_previous_output() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing("1", &["/p/1"])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 1, &dir);
    config.render.enabled = true;
    config.render.chrome_executable = Some(
        dir.path()
            .join("no-such-chrome")
            .display()
            .to_string(),
    );
    let csv_path = std::path::PathBuf::from(&config.output.csv_path);
    std::fs::write(&csv_path, "previous run\n").unwrap();

    let err = crawl(config).await.unwrap_err();

    assert!(matches!(err, catalog_walker::CrawlError::Session(RenderError::Launch(_))));
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), "previous run\n");
}
