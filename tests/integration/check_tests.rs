//! Integration tests for the link validator
//!
//! Each test writes a link CSV into a temporary directory, points its rows
//! at a wiremock server and inspects both reports.

use link_ripple::checker::run_check;
use link_ripple::config::Config;
use link_ripple::{ErrorKind, RippleError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Paths {
    _dir: TempDir,
    links: PathBuf,
    report: PathBuf,
    report_404: PathBuf,
}

/// Writes `rows` under a `URL,Parent URL` header and returns the run's paths
fn write_links(rows: &[(String, &str)]) -> Paths {
    let dir = TempDir::new().unwrap();
    let links = dir.path().join("get-links.csv");

    let mut writer = csv::Writer::from_path(&links).unwrap();
    writer.write_record(["URL", "Parent URL"]).unwrap();
    for (url, parent) in rows {
        writer.write_record([url.as_str(), *parent]).unwrap();
    }
    writer.flush().unwrap();

    Paths {
        report: dir.path().join("reports/check-links-report.csv"),
        report_404: dir.path().join("reports/check-links-404-report.csv"),
        links,
        _dir: dir,
    }
}

fn create_test_config(max_retries: u32, timeout_secs: u64) -> Config {
    let mut config = Config::default();
    config.checker.max_retries = max_retries;
    config.checker.retry_delay_ms = 10;
    config.checker.timeout_secs = timeout_secs;
    config.checker.max_concurrent = 4;
    config.checker.batch_size = 2;
    config
}

fn read_report(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open report");
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["URL", "Status Code", "Content-Type", "Parent URL", "Input Line Number"]
    );
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_ok_missing_and_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let paths = write_links(&[
        (format!("{}/ok", base_url), "https://parent.example/one"),
        (format!("{}/gone", base_url), "https://parent.example/two"),
        (format!("{}/down", base_url), "https://parent.example/three"),
    ]);
    let config = create_test_config(2, 1);

    let stats = run_check(&config, &paths.links, &paths.report, &paths.report_404)
        .await
        .expect("Check failed");

    let main = read_report(&paths.report);
    assert_eq!(main.len(), 3);
    assert_eq!(
        main[0],
        vec![
            format!("{}/ok", base_url),
            "200".to_string(),
            "text/html".to_string(),
            "https://parent.example/one".to_string(),
            "2".to_string(),
        ]
    );
    assert_eq!(main[1][1], "404");
    assert_eq!(main[1][4], "3");
    assert_eq!(main[2][1], "");
    assert_eq!(main[2][3], "https://parent.example/three");
    assert_eq!(main[2][4], "4");

    let not_found = read_report(&paths.report_404);
    assert_eq!(not_found, vec![main[1].clone()]);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.ok, 1);
    assert_eq!(stats.not_found, 1);
    assert_eq!(stats.errors.get(&ErrorKind::Timeout), Some(&1));
    let broken: Vec<u64> = stats.broken.iter().map(|b| b.line_number).collect();
    assert_eq!(broken, vec![3, 4]);
}

#[tokio::test]
async fn test_transient_server_error_recovers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let paths = write_links(&[(format!("{}/flaky", base_url), "")]);
    let config = create_test_config(3, 5);

    let stats = run_check(&config, &paths.links, &paths.report, &paths.report_404)
        .await
        .expect("Check failed");

    let main = read_report(&paths.report);
    assert_eq!(main[0][1], "200");
    assert!(read_report(&paths.report_404).is_empty());
    assert!(!stats.has_broken_links());
}

#[tokio::test]
async fn test_every_row_reported_across_batches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    // The same URL twice is two rows, not one
    let mut rows: Vec<(String, &str)> = (0..7).map(|i| (format!("{}/p{}", base_url, i), "")).collect();
    rows.push((format!("{}/p0", base_url), ""));
    let paths = write_links(&rows);
    let config = create_test_config(0, 5);

    run_check(&config, &paths.links, &paths.report, &paths.report_404)
        .await
        .expect("Check failed");

    let lines: Vec<String> = read_report(&paths.report).into_iter().map(|r| r[4].clone()).collect();
    let expected: Vec<String> = (2..=9).map(|n| n.to_string()).collect();
    assert_eq!(lines, expected);
}

#[tokio::test]
async fn test_malformed_row_aborts_before_reports() {
    let dir = TempDir::new().unwrap();
    let links = dir.path().join("get-links.csv");
    std::fs::write(&links, "URL,Parent URL\nhttps://ok.example/,\nnot a url,\n").unwrap();
    let report = dir.path().join("report.csv");
    let report_404 = dir.path().join("report-404.csv");

    let result = run_check(&create_test_config(0, 5), &links, &report, &report_404).await;

    assert!(matches!(result, Err(RippleError::MalformedInput { line: 3, .. })));
    assert!(!report.exists());
    assert!(!report_404.exists());
}

#[tokio::test]
async fn test_missing_input_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = run_check(
        &create_test_config(0, 5),
        &dir.path().join("absent.csv"),
        &dir.path().join("report.csv"),
        &dir.path().join("report-404.csv"),
    )
    .await;

    assert!(result.is_err());
}
