//! End-to-end runs against mock brokerage and scanner endpoints

use market_movers::core::Direction;
use market_movers::report::HEADER;
use market_movers::sources::{DirectoryError, ScanError};
use market_movers::{Config, MoversError, Pipeline};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stocks_body(tickers: &[&str]) -> Value {
    let instruments: Vec<Value> = tickers
        .iter()
        .map(|t| json!({"figi": format!("FIGI{}", t), "ticker": t, "lot": 1, "currency": "USD", "name": t, "type": "Stock"}))
        .collect();
    json!({
        "trackingId": "track-1",
        "status": "Ok",
        "payload": {"instruments": instruments, "total": tickers.len()}
    })
}

fn scan_row(ticker: &str, change: f64) -> Value {
    json!({
        "s": format!("NASDAQ:{}", ticker),
        "d": [ticker, 100.5, change, 1.25, 0.1, 1_000_000, 5.0e9, null, null, null,
              "Technology Services", format!("{} Corp", ticker), ticker, "stock", "common"]
    })
}

fn scan_body(rows: Vec<Value>) -> Value {
    json!({"data": rows, "totalCount": 999})
}

struct Upstream {
    server: MockServer,
    out: TempDir,
}

impl Upstream {
    async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            out: tempfile::tempdir().unwrap(),
        }
    }

    async fn directory(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/openapi/market/stocks"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    async fn screen(&self, direction: Direction, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/america/scan"))
            .and(body_partial_json(json!({"sort": {"sortOrder": direction_order(direction)}})))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        config.brokerage.url = format!("{}/openapi/market/stocks", self.server.uri());
        config.brokerage.token = "token".to_string();
        config.scanner.url = format!("{}/america/scan", self.server.uri());
        config.output.gainers_path = self.out.path().join("top_gainers");
        config.output.losers_path = self.out.path().join("top_losers");
        config
    }

    fn pipeline(&self, config: &Config) -> Pipeline {
        Pipeline::with_client(reqwest::Client::new(), config)
    }
}

fn direction_order(direction: Direction) -> &'static str {
    match direction {
        Direction::Gainers => "desc",
        Direction::Losers => "asc",
    }
}

fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn tickers_in(report: &str) -> Vec<String> {
    report
        .lines()
        .skip(1)
        .map(|line| line.split('\t').nth(1).unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_run_writes_filtered_reports_in_rank_order() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL", "MSFT", "ZM"]))).await;
    upstream
        .screen(
            Direction::Gainers,
            ok_json(scan_body(vec![
                scan_row("AAPL", 9.1),
                scan_row("TSLA", 7.3),
                scan_row("MSFT", 2.2),
            ])),
        )
        .await;
    upstream
        .screen(
            Direction::Losers,
            ok_json(scan_body(vec![scan_row("ZM", -8.0), scan_row("GME", -3.5)])),
        )
        .await;

    let config = upstream.config();
    let summary = upstream.pipeline(&config).run().await.unwrap();
    assert!(summary.all_written());

    let gainers = summary.outcome(Direction::Gainers).unwrap();
    assert_eq!(gainers.received, 3);
    assert_eq!(gainers.kept, 2);

    let gainers_file = read(&config.output.gainers_path);
    assert_eq!(gainers_file.lines().next(), Some(HEADER));
    assert_eq!(tickers_in(&gainers_file), vec!["AAPL", "MSFT"]);
    assert_eq!(
        gainers_file.lines().nth(1),
        Some("AAPL Corp\tAAPL\t100.5\t9.1\t1.25\t1000000\tTechnology Services")
    );

    let losers_file = read(&config.output.losers_path);
    assert_eq!(tickers_in(&losers_file), vec!["ZM"]);
    assert!(!losers_file.ends_with('\n'));
}

#[tokio::test]
async fn test_empty_screens_write_header_only() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL"]))).await;
    upstream.screen(Direction::Gainers, ok_json(scan_body(Vec::new()))).await;
    upstream.screen(Direction::Losers, ok_json(scan_body(Vec::new()))).await;

    let config = upstream.config();
    upstream.pipeline(&config).run().await.unwrap();

    assert_eq!(read(&config.output.gainers_path), HEADER);
    assert_eq!(read(&config.output.losers_path), HEADER);
}

#[tokio::test]
async fn test_directory_status_error_aborts_before_writing() {
    let upstream = Upstream::start().await;
    upstream
        .directory(ok_json(json!({"trackingId": "bad-1", "status": "Error", "payload": {}})))
        .await;
    upstream.screen(Direction::Gainers, ok_json(scan_body(vec![scan_row("AAPL", 1.0)]))).await;
    upstream.screen(Direction::Losers, ok_json(scan_body(vec![scan_row("AAPL", -1.0)]))).await;

    let config = upstream.config();
    let err = upstream.pipeline(&config).run().await.unwrap_err();

    assert!(matches!(
        err,
        MoversError::Directory(DirectoryError::Status { ref tracking_id, .. }) if tracking_id == "bad-1"
    ));
    assert!(!config.output.gainers_path.exists());
    assert!(!config.output.losers_path.exists());
}

#[tokio::test]
async fn test_scanner_failure_forfeits_both_reports() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL"]))).await;
    upstream.screen(Direction::Gainers, ok_json(scan_body(vec![scan_row("AAPL", 1.0)]))).await;
    upstream.screen(Direction::Losers, ResponseTemplate::new(500)).await;

    let config = upstream.config();
    let err = upstream.pipeline(&config).run().await.unwrap_err();

    assert!(matches!(err, MoversError::Scanner(ScanError::Http { status: 500, .. })));
    assert!(!config.output.gainers_path.exists());
    assert!(!config.output.losers_path.exists());
}

#[tokio::test]
async fn test_malformed_row_is_fatal() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL"]))).await;
    upstream
        .screen(
            Direction::Gainers,
            ok_json(scan_body(vec![json!({"s": "NASDAQ:AAPL", "d": ["AAPL", 100.5, 2.0]})])),
        )
        .await;
    upstream.screen(Direction::Losers, ok_json(scan_body(Vec::new()))).await;

    let config = upstream.config();
    let err = upstream.pipeline(&config).run().await.unwrap_err();

    assert!(matches!(
        err,
        MoversError::Scanner(ScanError::MalformedRow { column: "description", .. })
    ));
    assert!(!config.output.gainers_path.exists());
}

#[tokio::test]
async fn test_write_failure_is_reported_not_fatal() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL"]))).await;
    upstream.screen(Direction::Gainers, ok_json(scan_body(vec![scan_row("AAPL", 4.0)]))).await;
    upstream.screen(Direction::Losers, ok_json(scan_body(vec![scan_row("AAPL", -4.0)]))).await;

    let mut config = upstream.config();
    config.output.gainers_path = upstream.out.path().join("no-such-dir").join("top_gainers");
    let summary = upstream.pipeline(&config).run().await.unwrap();

    assert!(!summary.all_written());
    let gainers = summary.outcome(Direction::Gainers).unwrap();
    assert!(gainers.error.is_some());
    let losers = summary.outcome(Direction::Losers).unwrap();
    assert!(losers.is_written());
    assert_eq!(tickers_in(&read(&config.output.losers_path)), vec!["AAPL"]);
}

#[tokio::test]
async fn test_concurrent_screens_match_sequential_output() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL", "MSFT"]))).await;
    upstream
        .screen(
            Direction::Gainers,
            ok_json(scan_body(vec![scan_row("MSFT", 3.0), scan_row("AAPL", 1.5)])),
        )
        .await;
    upstream
        .screen(Direction::Losers, ok_json(scan_body(vec![scan_row("AAPL", -0.25)])))
        .await;

    let config = upstream.config();
    upstream.pipeline(&config).run().await.unwrap();
    let sequential = (read(&config.output.gainers_path), read(&config.output.losers_path));

    let mut concurrent = config.clone();
    concurrent.pipeline.concurrent_screens = true;
    upstream.pipeline(&concurrent).run().await.unwrap();
    let parallel = (read(&config.output.gainers_path), read(&config.output.losers_path));

    assert_eq!(sequential, parallel);
    assert_eq!(tickers_in(&sequential.0), vec!["MSFT", "AAPL"]);
}

#[tokio::test]
async fn test_repeated_runs_are_byte_identical() {
    let upstream = Upstream::start().await;
    upstream.directory(ok_json(stocks_body(&["AAPL", "MSFT", "ZM"]))).await;
    upstream
        .screen(
            Direction::Gainers,
            ok_json(scan_body(vec![scan_row("ZM", 12.0), scan_row("MSFT", 0.5)])),
        )
        .await;
    upstream
        .screen(Direction::Losers, ok_json(scan_body(vec![scan_row("AAPL", -1.75)])))
        .await;

    let config = upstream.config();
    let pipeline = upstream.pipeline(&config);

    pipeline.run().await.unwrap();
    let first = (
        std::fs::read(&config.output.gainers_path).unwrap(),
        std::fs::read(&config.output.losers_path).unwrap(),
    );

    pipeline.run().await.unwrap();
    let second = (
        std::fs::read(&config.output.gainers_path).unwrap(),
        std::fs::read(&config.output.losers_path).unwrap(),
    );

    assert_eq!(first, second);
}
