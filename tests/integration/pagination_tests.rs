//! Integration tests for the page loop
//!
//! These tests use wiremock to serve a paginated catalog and run the full
//! fetch, extract and aggregate cycle end-to-end.

use product_scraper::config::{
    Config, FetcherConfig, OutputConfig, PaginationConfig, SelectorConfig,
};
use product_scraper::crawler::{run_scrape, Fetcher, PageOutcome, Paginator, StopReason};
use product_scraper::output::{export_records, read_export, ExportFormat};
use product_scraper::{FetchError, ItemRecord};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the mock catalog at `base_url`
fn create_test_config(base_url: &str, max_pages: Option<u32>) -> Config {
    Config {
        pagination: PaginationConfig {
            url_template: format!("{}/laptops?page={{page}}", base_url),
            start_page: 1,
            max_pages,
            stop_on_empty_page: true,
            max_consecutive_failures: 3,
        },
        fetcher: FetcherConfig {
            user_agent: "TestBot/1.0".to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            max_retries: 0,
            retry_delay_ms: 0,
            page_delay_ms: 0,
        },
        selectors: SelectorConfig::default(),
        output: OutputConfig::default(),
    }
}

fn card(name: &str, price: f64, rating: u8) -> String {
    format!(
        r#"<div class="card-body">
            <img src="/images/{rating}.png">
            <h4 class="price">${price:.2}</h4>
            <h4><a class="title" title="{name}" href="/product">{name}</a></h4>
            <p class="description">{name} description</p>
            <p class="review-count">{rating} reviews</p>
            <p data-rating="{rating}"></p>
        </div>"#
    )
}

fn catalog_page(cards: &[String]) -> String {
    format!(
        "<html><head><title>Laptops</title></head><body><div class=\"row\">{}</div></body></html>",
        cards.join("\n")
    )
}

/// Cards named `<prefix> 1` .. `<prefix> n`
fn cards(prefix: &str, n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| card(&format!("{} {}", prefix, i), 100.0 * i as f64, (i % 5) as u8 + 1))
        .collect()
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/laptops"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn names(records: &[ItemRecord]) -> Vec<&str> {
    records.iter().map(ItemRecord::name).collect()
}

#[tokio::test]
async fn test_stops_at_first_empty_page() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(catalog_page(&cards("Alpha", 2))), 1).await;
    mount_page(&mock_server, 2, html(catalog_page(&cards("Beta", 1))), 1).await;
    mount_page(&mock_server, 3, html(catalog_page(&[])), 1).await;
    // Never requested
    mount_page(&mock_server, 4, html(catalog_page(&cards("Gamma", 3))), 0).await;

    let config = create_test_config(&mock_server.uri(), None);
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["Alpha 1", "Alpha 2", "Beta 1"]);
    assert_eq!(report.stop_reason, StopReason::EmptyPage { page: 3 });
    assert_eq!(report.pages_visited(), 3);
    assert_eq!(report.pages[2].outcome, PageOutcome::Empty);
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(catalog_page(&cards("One", 1))), 1).await;
    mount_page(&mock_server, 2, html(catalog_page(&cards("Two", 1))), 1).await;
    mount_page(&mock_server, 3, ResponseTemplate::new(404), 1).await;
    mount_page(&mock_server, 4, html(catalog_page(&cards("Four", 1))), 1).await;
    mount_page(&mock_server, 5, html(catalog_page(&cards("Five", 1))), 1).await;

    let config = create_test_config(&mock_server.uri(), Some(5));
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(
        names(&report.records),
        vec!["One 1", "Two 1", "Four 1", "Five 1"]
    );
    assert_eq!(report.stop_reason, StopReason::MaxPages);
    assert_eq!(report.pages_failed(), 1);
    assert!(report.pages[2].outcome.is_error());
}

#[tokio::test]
async fn test_consecutive_failures_stop_run() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(catalog_page(&cards("Kept", 2))), 1).await;
    mount_page(&mock_server, 2, ResponseTemplate::new(500), 1).await;
    mount_page(&mock_server, 3, ResponseTemplate::new(503), 1).await;
    mount_page(&mock_server, 4, html(catalog_page(&cards("Late", 1))), 0).await;

    let mut config = create_test_config(&mock_server.uri(), None);
    config.pagination.max_consecutive_failures = 2;
    let report = run_scrape(&config).await.expect("scrape failed");

    // Records from before the failures survive
    assert_eq!(names(&report.records), vec!["Kept 1", "Kept 2"]);
    assert_eq!(
        report.stop_reason,
        StopReason::ConsecutiveFailures {
            page: 3,
            failures: 2
        }
    );
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, ResponseTemplate::new(500), 1).await;
    mount_page(&mock_server, 2, html(catalog_page(&cards("Two", 1))), 1).await;
    mount_page(&mock_server, 3, ResponseTemplate::new(500), 1).await;
    mount_page(&mock_server, 4, html(catalog_page(&[])), 1).await;

    let mut config = create_test_config(&mock_server.uri(), None);
    config.pagination.max_consecutive_failures = 2;
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["Two 1"]);
    assert_eq!(report.stop_reason, StopReason::EmptyPage { page: 4 });
    assert_eq!(report.pages_failed(), 2);
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let mock_server = MockServer::start().await;

    // First attempt fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/laptops"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 1, html(catalog_page(&cards("Retried", 2))), 1).await;

    let mut config = create_test_config(&mock_server.uri(), Some(1));
    config.fetcher.max_retries = 2;
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.pages_failed(), 0);
    assert_eq!(
        report.pages[0].outcome,
        PageOutcome::Scraped { found: 2, added: 2 }
    );
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, ResponseTemplate::new(404), 1).await;

    let mut config = create_test_config(&mock_server.uri(), Some(1));
    config.fetcher.max_retries = 3;
    let report = run_scrape(&config).await.expect("scrape failed");

    assert!(report.records.is_empty());
    assert_eq!(report.pages_failed(), 1);
}

#[tokio::test]
async fn test_max_pages_bounds_requests() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(catalog_page(&cards("First", 1))), 1).await;
    mount_page(&mock_server, 2, html(catalog_page(&cards("Second", 1))), 1).await;
    mount_page(&mock_server, 3, html(catalog_page(&cards("Third", 1))), 0).await;

    let config = create_test_config(&mock_server.uri(), Some(2));
    let paginator = Paginator::new(&config).expect("paginator");
    let report = paginator.run().await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["First 1", "Second 1"]);
    assert_eq!(report.stop_reason, StopReason::MaxPages);
}

#[tokio::test]
async fn test_duplicates_across_pages_are_dropped() {
    let mock_server = MockServer::start().await;

    let shared = card("Shared", 499.0, 4);
    mount_page(
        &mock_server,
        1,
        html(catalog_page(&[card("Only on one", 199.0, 3), shared.clone()])),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        2,
        html(catalog_page(&[shared, card("Only on two", 899.0, 5)])),
        1,
    )
    .await;
    mount_page(&mock_server, 3, html(catalog_page(&[])), 1).await;

    let config = create_test_config(&mock_server.uri(), None);
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(
        names(&report.records),
        vec!["Only on one", "Shared", "Only on two"]
    );
    assert_eq!(
        report.pages[1].outcome,
        PageOutcome::Scraped { found: 2, added: 1 }
    );
    assert_eq!(report.records_found(), 4);
}

#[tokio::test]
async fn test_invalid_listings_are_skipped() {
    let mock_server = MockServer::start().await;

    let nameless = r#"<div class="card-body"><h4 class="price">$10.00</h4></div>"#.to_string();
    let unpriceable = r#"<div class="card-body">
            <a class="title" title="Broken">Broken</a>
            <h4 class="price">call us</h4>
        </div>"#
        .to_string();
    mount_page(
        &mock_server,
        1,
        html(catalog_page(&[nameless, card("Valid", 250.0, 2), unpriceable])),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri(), Some(1));
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["Valid"]);
    let record = &report.records[0];
    assert_eq!(record.price(), Some(250.0));
    assert_eq!(record.rating(), Some(2.0));
    assert_eq!(record.reviews(), Some(2));
    assert_eq!(
        record.image(),
        Some(format!("{}/images/2.png", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_page_of_invalid_listings_does_not_end_run() {
    let mock_server = MockServer::start().await;

    let unpriced = |name: &str, price: &str| {
        format!(
            r#"<div class="card-body">
                <a class="title" title="{name}">{name}</a>
                <h4 class="price">{price}</h4>
            </div>"#
        )
    };

    mount_page(&mock_server, 1, html(catalog_page(&cards("Before", 1))), 1).await;
    mount_page(
        &mock_server,
        2,
        html(catalog_page(&[
            unpriced("Call", "call us"),
            unpriced("Sold", "sold out"),
        ])),
        1,
    )
    .await;
    mount_page(&mock_server, 3, html(catalog_page(&cards("After", 1))), 1).await;
    mount_page(&mock_server, 4, html(catalog_page(&[])), 1).await;

    let config = create_test_config(&mock_server.uri(), None);
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["Before 1", "After 1"]);
    assert_eq!(report.pages[1].outcome, PageOutcome::Rejected { listings: 2 });
    assert_eq!(report.stop_reason, StopReason::EmptyPage { page: 4 });
    assert_eq!(report.pages_failed(), 0);
}

#[tokio::test]
async fn test_slow_response_times_out_after_retries() {
    let mock_server = MockServer::start().await;

    // One initial attempt plus one retry
    mount_page(
        &mock_server,
        1,
        html(catalog_page(&cards("Slow", 1))).set_delay(Duration::from_secs(3)),
        2,
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), Some(1));
    config.fetcher.timeout_secs = 1;
    config.fetcher.connect_timeout_secs = 1;
    config.fetcher.max_retries = 1;

    let fetcher = Fetcher::new(&config.fetcher).expect("client");
    let url = format!("{}/laptops?page=1", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    assert!(
        matches!(result, Err(FetchError::Timeout { .. })),
        "expected timeout, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_timed_out_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        html(catalog_page(&cards("Slow", 1))).set_delay(Duration::from_secs(3)),
        1,
    )
    .await;
    mount_page(&mock_server, 2, html(catalog_page(&cards("Fast", 1))), 1).await;

    let mut config = create_test_config(&mock_server.uri(), Some(2));
    config.fetcher.timeout_secs = 1;
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["Fast 1"]);
    match &report.pages[0].outcome {
        PageOutcome::Failed { error } => assert!(error.contains("timeout"), "{}", error),
        other => panic!("expected failed page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_then_fast_response_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/laptops"))
        .and(query_param("page", "1"))
        .respond_with(
            html(catalog_page(&cards("Delayed", 1))).set_delay(Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 1, html(catalog_page(&cards("Recovered", 2))), 1).await;

    let mut config = create_test_config(&mock_server.uri(), Some(1));
    config.fetcher.timeout_secs = 1;
    config.fetcher.max_retries = 1;
    let report = run_scrape(&config).await.expect("scrape failed");

    assert_eq!(names(&report.records), vec!["Recovered 1", "Recovered 2"]);
    assert_eq!(report.pages_failed(), 0);
}

#[tokio::test]
async fn test_non_html_page_counts_as_failure() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, ResponseTemplate::new(200), 1).await;
    mount_page(&mock_server, 2, html(catalog_page(&cards("After", 1))), 1).await;

    let config = create_test_config(&mock_server.uri(), Some(2));
    let report = run_scrape(&config).await.expect("scrape failed");

    assert!(report.pages[0].outcome.is_error());
    assert_eq!(names(&report.records), vec!["After 1"]);
}

#[tokio::test]
async fn test_scrape_then_export_round_trip() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, html(catalog_page(&cards("Laptop", 3))), 1).await;
    mount_page(&mock_server, 2, html(catalog_page(&[])), 1).await;

    let out_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri(), None);
    config.output = OutputConfig {
        directory: out_dir.path().to_string_lossy().into_owned(),
        file_stem: "laptops".to_string(),
        formats: vec![ExportFormat::Csv, ExportFormat::Json],
        timestamped: false,
        report_path: None,
    };

    let report = run_scrape(&config).await.expect("scrape failed");
    let written =
        export_records(&report.records, &config.output, chrono::Local::now()).expect("export");

    assert_eq!(written.len(), 2);
    for path in &written {
        let records = read_export(path).expect("read back");
        assert_eq!(records, report.records);
    }
}
