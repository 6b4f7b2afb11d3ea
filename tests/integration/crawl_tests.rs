//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the dictionary site and run
//! full crawls end-to-end into a temporary output file.

use lexicon_harvest::config::{Config, Dictionary};
use lexicon_harvest::crawler::run_crawl;
use lexicon_harvest::index::parse_keys;
use lexicon_harvest::HarvestError;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, keys: &str, output: &Path) -> Config {
    let mut config = Config::new(Dictionary::Medical);
    config.crawler.base_url = base_url.to_string();
    config.crawler.min_delay_secs = 0;
    config.crawler.request_timeout_secs = 5;
    config.keys = parse_keys(keys).expect("valid keys");
    config.output.path = output.to_path_buf();
    config
}

/// Renders a browse page with an optional counter and one entry group per slice
fn browse_page(counter: Option<&str>, groups: &[&[&str]]) -> String {
    let mut html = String::from("<html><head><title>Browse</title></head><body>");
    html.push_str(r#"<nav><a href="/">Home</a></nav>"#);
    if let Some(counter) = counter {
        html.push_str(&format!(r#"<span class="counters">{}</span>"#, counter));
    }
    for group in groups {
        html.push_str(r#"<div class="entries"><ul>"#);
        for word in *group {
            html.push_str(&format!(
                r#"<li><a href="/dictionary/{0}">{0}</a></li>"#,
                word
            ));
        }
        html.push_str("</ul></div>");
    }
    html.push_str("</body></html>");
    html
}

async fn mount_page(server: &MockServer, url_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, url_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts the two-key site: `a` spans two pages, `b` has no counter
async fn mount_two_key_site(server: &MockServer) {
    mount_page(
        server,
        "/medical/a/1",
        browse_page(Some("page 1 of 2"), &[&["apple", "ant"]]),
    )
    .await;
    mount_page(
        server,
        "/medical/a/2",
        browse_page(Some("page 2 of 2"), &[&["azure"]]),
    )
    .await;
    mount_page(server, "/medical/b/1", browse_page(None, &[&["banana"]])).await;
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

/// Captures formatted log output for assertions
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_two_key_crawl_writes_words_in_order() {
    let mock_server = MockServer::start().await;
    mount_two_key_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("dictionary/medical_word_list.tsv");
    let config = create_test_config(&mock_server.uri(), "ab", &output);

    let outcome = run_crawl(config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    let content = std::fs::read_to_string(&output).expect("output written");
    assert_eq!(content, "apple\nant\nazure\nbanana");

    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines, outcome.entries);
    assert!(!outcome.report.cancelled);
    assert_eq!(outcome.report.total_entries(), 4);

    // Pre-phase: page 1 of each key. Main phase: every page once.
    assert_eq!(
        requested_paths(&mock_server).await,
        vec![
            "/medical/a/1",
            "/medical/b/1",
            "/medical/a/1",
            "/medical/a/2",
            "/medical/b/1",
        ]
    );
}

#[tokio::test]
async fn test_404_page_is_skipped_with_warning() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/medical/a/1",
        browse_page(Some("page 1 of 3"), &[&["apple"]]),
    )
    .await;
    mount_status(&mock_server, "/medical/a/2", 404).await;
    mount_page(
        &mock_server,
        "/medical/a/3",
        browse_page(Some("page 3 of 3"), &[&["azure"]]),
    )
    .await;
    mount_page(&mock_server, "/medical/b/1", browse_page(None, &[&["banana"]])).await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("words.tsv");
    let config = create_test_config(&mock_server.uri(), "ab", &output);

    let outcome = run_crawl(config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "apple\nazure\nbanana"
    );
    assert_eq!(outcome.report.keys[0].pages_attempted, 3);
    assert_eq!(outcome.report.keys[0].pages_failed, 1);

    let log_output = logs.contents();
    let warning = log_output
        .lines()
        .find(|line| line.contains("WARN") && line.contains("404"))
        .expect("a warning for the 404 page");
    assert!(warning.contains("key=a"), "warning was: {}", warning);
    assert!(warning.contains("page=2"), "warning was: {}", warning);
    assert!(warning.contains("/medical/a/2"), "warning was: {}", warning);
}

#[tokio::test]
async fn test_failed_first_page_yields_no_entries_for_key() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/medical/a/1", 500).await;
    mount_page(&mock_server, "/medical/b/1", browse_page(None, &[&["banana"]])).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("words.tsv");
    let config = create_test_config(&mock_server.uri(), "ab", &output);

    let outcome = run_crawl(config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "banana");
    assert_eq!(outcome.report.keys[0].page_count.get(), 1);
    assert_eq!(outcome.report.keys[0].entries, 0);

    let a_requests = requested_paths(&mock_server)
        .await
        .into_iter()
        .filter(|p| p == "/medical/a/1")
        .count();
    assert_eq!(a_requests, 2);
}

#[tokio::test]
async fn test_unparseable_counter_fetches_single_page() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/medical/c/1",
        browse_page(Some("page 1 of "), &[&["cat", "cow"]]),
    )
    .await;
    mount_page(&mock_server, "/medical/c/2", browse_page(None, &[&["never"]])).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("words.tsv");
    let config = create_test_config(&mock_server.uri(), "c", &output);

    run_crawl(config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "cat\ncow");
    assert!(!requested_paths(&mock_server)
        .await
        .contains(&"/medical/c/2".to_string()));
}

#[tokio::test]
async fn test_cancellation_keeps_partial_output() {
    let mock_server = Arc::new(MockServer::start().await);
    mount_two_key_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("words.tsv");
    let mut config = create_test_config(&mock_server.uri(), "ab", &output);
    // Long enough that the crawl is parked in the delay after key `a`
    config.crawler.min_delay_secs = 60;

    let cancel = CancellationToken::new();
    let watcher = {
        let server = Arc::clone(&mock_server);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                if requested_paths(&server)
                    .await
                    .iter()
                    .any(|p| p == "/medical/a/2")
                {
                    cancel.cancel();
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
    };

    let outcome = tokio::time::timeout(Duration::from_secs(20), run_crawl(config, cancel))
        .await
        .expect("cancellation cut the delay short")
        .expect("Crawl failed");
    watcher.await.unwrap();

    assert!(outcome.report.cancelled);
    assert_eq!(outcome.report.keys.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "apple\nant\nazure"
    );
}

#[tokio::test]
async fn test_unwritable_output_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    mount_two_key_site(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-directory");
    std::fs::write(&blocker, "a file where a directory should be").unwrap();
    let config = create_test_config(&mock_server.uri(), "ab", &blocker.join("words.tsv"));

    let result = run_crawl(config, CancellationToken::new()).await;

    assert!(matches!(result, Err(HarvestError::Output { .. })));
    assert!(requested_paths(&mock_server).await.is_empty());
}
