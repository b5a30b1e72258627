//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::Path;
use std::time::{Duration, Instant};
use wiki_distill::config::{Config, FetcherConfig};
use wiki_distill::crawler::{run_crawl, Coordinator, FetchError};
use wiki_distill::output::read_records;
use wiki_distill::{CrawlPhase, DistillError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.index_url = format!("{}/index.php?title=Index", base_url);
    config.fetcher = FetcherConfig {
        retry_limit: 1,
        backoff_base_ms: 1,
        timeout_short_ms: 2000,
        timeout_long_ms: 3000,
        manual_retry_delay_ms: 1,
        politeness_delay_ms: 0, // No pause for testing
        ..FetcherConfig::default()
    };
    config.output.path = output.display().to_string();
    config
}

fn index_page(anchors: &str) -> String {
    format!(
        r#"<html><head><title>Index</title></head><body>
        <div id="mw-navigation"><a href="/index.php?title=Main" title="Main">Main</a></div>
        <div id="mw-content-text">{}</div>
        </body></html>"#,
        anchors
    )
}

fn detail_page(heading: &str, body: &str) -> String {
    format!(
        r#"<html><body>
        <div id="mw-navigation">nav</div>
        <h1 id="firstHeading">{}</h1>
        <div class="mw-parser-output">
            <div id="toc">Contents</div>
            {}
        </div>
        <div id="footer">footer</div>
        </body></html>"#,
        heading, body
    )
}

async fn mount_page(server: &MockServer, title: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("title", title))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_with_excluded_and_duplicate_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(
            r#"<a href="/index.php?title=Imp" title="Imp">Imp</a>
               <a href="/index.php?title=Imp&action=edit" title="编辑Imp">edit</a>
               <a href="/index.php?title=Baron" title="Baron">Baron</a>
               <a href="/index.php?title=Imp" title="Imp">Imp again</a>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "Imp",
        200,
        detail_page(
            "小恶魔",
            r#"<h2>角色能力<span class="mw-editsection">[编辑]</span></h2>
               <p>每个夜晚*，你要选择一名玩家：他死亡。</p>
               <h3>范例</h3>
               <pre>Kill the Imp</pre>
               <ul><li>A</li><li>B</li></ul>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "Baron",
        200,
        detail_page("Baron", "<p>There are extra Outsiders in play.</p>"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("records.json");
    let config = create_test_config(&base_url, &output);

    let report = run_crawl(config).await.expect("crawl should succeed");
    assert_eq!(report.targets_discovered, 2);
    assert_eq!(report.records_written, 2);
    assert!(report.targets_skipped.is_empty());

    let records = read_records(&output).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].name, "小恶魔");
    assert_eq!(records[0].url, format!("{}/index.php?title=Imp", base_url));
    assert_eq!(
        records[0].content,
        "【角色能力】\n每个夜晚*，你要选择一名玩家：他死亡。\n[范例]\n> 范例: Kill the Imp\n- A\n- B"
    );

    assert_eq!(records[1].id, 2);
    assert_eq!(records[1].name, "Baron");
    assert_eq!(records[1].content, "There are extra Outsiders in play.");
}

#[tokio::test]
async fn test_failed_detail_page_is_skipped_without_gap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(
            r#"<a href="/index.php?title=Washerwoman" title="Washerwoman">1</a>
               <a href="/index.php?title=Librarian" title="Librarian">2</a>
               <a href="/index.php?title=Investigator" title="Investigator">3</a>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "Washerwoman",
        200,
        detail_page("Washerwoman", "<p>first</p>"),
    )
    .await;

    // Initial attempt plus the single manual retry
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("title", "Librarian"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "Investigator",
        200,
        detail_page("Investigator", "<p>third</p>"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("records.json");
    let config = create_test_config(&base_url, &output);

    let report = run_crawl(config).await.expect("crawl should succeed");
    assert_eq!(report.targets_discovered, 3);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.targets_skipped.len(), 1);
    assert_eq!(report.targets_skipped[0].title, "Librarian");

    let records = read_records(&output).unwrap();
    let summary: Vec<(usize, &str)> = records.iter().map(|r| (r.id, r.name.as_str())).collect();
    assert_eq!(summary, vec![(1, "Washerwoman"), (2, "Investigator")]);
}

#[tokio::test]
async fn test_unreachable_index_aborts_without_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Two attempts, each with one automatic 5xx retry
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("title", "Index"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("records.json");
    let config = create_test_config(&base_url, &output);

    let result = run_crawl(config).await;
    match result {
        Err(DistillError::Fetch(failure)) => {
            assert!(failure.url.ends_with("/index.php?title=Index"));
            assert!(matches!(failure.source, FetchError::Status(500)));
        }
        other => panic!("expected index fetch failure, got {:?}", other),
    }

    assert!(!output.exists());
}

#[tokio::test]
async fn test_transient_index_failure_recovers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("title", "Index"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(r#"<a href="/index.php?title=Imp" title="Imp">Imp</a>"#),
    )
    .await;

    mount_page(&mock_server, "Imp", 200, detail_page("Imp", "<p>text</p>")).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("records.json");
    let config = create_test_config(&base_url, &output);

    let report = run_crawl(config).await.expect("crawl should succeed");
    assert_eq!(report.records_written, 1);
}

#[tokio::test]
async fn test_coordinator_phases_and_fallbacks() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(
            r#"<a href="/index.php?title=NoHeading" title="无标题">a</a>
               <a href="/index.php?title=NoContent" title="NoContent">b</a>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "NoHeading",
        200,
        r#"<html><body><div class="mw-parser-output"><p>正文</p></div></body></html>"#.to_string(),
    )
    .await;

    mount_page(
        &mock_server,
        "NoContent",
        200,
        r#"<html><body><h1 id="firstHeading">Heading only</h1></body></html>"#.to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&base_url, &dir.path().join("unused.json"));

    let mut coordinator = Coordinator::new(config).unwrap();
    assert_eq!(coordinator.phase(), CrawlPhase::Init);

    let records = coordinator.run().await.unwrap();
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(coordinator.targets_discovered(), 2);

    assert_eq!(records[0].name, "无标题");
    assert_eq!(records[0].content, "正文");
    assert_eq!(records[1].name, "Heading only");
    assert_eq!(records[1].content, "");

    // A finished coordinator cannot be run again
    assert!(matches!(
        coordinator.run().await,
        Err(DistillError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_empty_index_writes_empty_array() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(r#"<a href="/index.php?title=Special:Search" title="Special:Search">s</a>"#),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("records.json");
    let config = create_test_config(&base_url, &output);

    let report = run_crawl(config).await.unwrap();
    assert_eq!(report.targets_discovered, 0);
    assert!(read_records(&output).unwrap().is_empty());
}

const POLITENESS_MS: u64 = 400;

fn polite_config(base_url: &str, output: &Path) -> Config {
    let mut config = create_test_config(base_url, output);
    config.fetcher.politeness_delay_ms = POLITENESS_MS;
    config
}

#[tokio::test]
async fn test_no_pause_after_index_or_failed_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(r#"<a href="/index.php?title=Gone" title="Gone">g</a>"#),
    )
    .await;
    mount_page(&mock_server, "Gone", 404, String::new()).await;

    let dir = tempfile::tempdir().unwrap();
    let config = polite_config(&base_url, &dir.path().join("records.json"));

    let started = Instant::now();
    let report = run_crawl(config).await.unwrap();

    assert_eq!(report.records_written, 0);
    assert!(started.elapsed() < Duration::from_millis(POLITENESS_MS));
}

#[tokio::test]
async fn test_pause_follows_each_successful_detail_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "Index",
        200,
        index_page(
            r#"<a href="/index.php?title=Gone" title="Gone">g</a>
               <a href="/index.php?title=Imp" title="Imp">i</a>"#,
        ),
    )
    .await;
    mount_page(&mock_server, "Gone", 404, String::new()).await;
    mount_page(&mock_server, "Imp", 200, detail_page("Imp", "<p>text</p>")).await;

    let dir = tempfile::tempdir().unwrap();
    let config = polite_config(&base_url, &dir.path().join("records.json"));

    let started = Instant::now();
    let report = run_crawl(config).await.unwrap();
    let elapsed = started.elapsed();

    // Exactly one pause: after Imp, not after the index or Gone
    assert_eq!(report.records_written, 1);
    assert!(elapsed >= Duration::from_millis(POLITENESS_MS));
    assert!(elapsed < Duration::from_millis(2 * POLITENESS_MS));
}
