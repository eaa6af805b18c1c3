//! End-to-end runs: CSV in, mock APIs, SQLite out

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{test_config, write_csv};
use ticker_enricher::models::Config;
use ticker_enricher::pipeline::{run, RunOutcome, RunSummary};
use ticker_enricher::storage::SqliteStore;

async fn mount_all_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lastPrice": 100.0})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sector": "Technology"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fundamentals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mode": "annual"})))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

#[test_log::test(tokio::test)]
async fn test_missing_csv_halts_before_any_call() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());

    let outcome = run(&config).await.unwrap();

    assert_eq!(outcome, RunOutcome::NoTickers);
    assert_eq!(request_count(&server).await, 0);
    assert!(!dir.path().join("enriched.db").exists());
}

#[test_log::test(tokio::test)]
async fn test_missing_column_halts_before_any_call() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(&dir, "tickers.csv", "TICKER,NAME\nAAPL,Apple Inc.\n");
    let config = Config {
        input: ticker_enricher::models::InputConfig {
            csv_path,
            column: "Symbol".to_string(),
        },
        ..test_config(&server.uri(), dir.path())
    };

    let outcome = run(&config).await.unwrap();

    assert_eq!(outcome, RunOutcome::NoTickers);
    assert_eq!(request_count(&server).await, 0);
    assert!(!dir.path().join("enriched.db").exists());
}

#[test_log::test(tokio::test)]
async fn test_header_only_csv_halts() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir, "tickers.csv", "SYMBOL\n");
    let config = test_config(&server.uri(), dir.path());

    assert_eq!(run(&config).await.unwrap(), RunOutcome::NoTickers);
    assert_eq!(request_count(&server).await, 0);
}

#[test_log::test(tokio::test)]
async fn test_full_run_persists_one_document_per_ticker() {
    let server = MockServer::start().await;
    // Mounted first so it takes priority for msft
    Mock::given(method("GET"))
        .and(path("/quotes"))
        .and(query_param("symbols", "msft"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_all_ok(&server).await;

    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir, "tickers.csv", "# symbol\nAAPL\n msft \n\"\"\nGOOG\n");
    let mut config = test_config(&server.uri(), dir.path());
    config.input.column = "Symbol".to_string();

    let outcome = run(&config).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Completed(RunSummary { total: 3, persisted: 3, failed: 0 })
    );
    assert_eq!(request_count(&server).await, 9);

    let stored = SqliteStore::new(&config.store).read_records().await.unwrap();
    let tickers: Vec<&str> = stored.iter().map(|s| s.record.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAPL", "msft", "GOOG"]);

    let msft = &stored[1].record;
    assert_eq!(msft.quotes_data, json!({}));
    assert_eq!(msft.profile_data, json!({"sector": "Technology"}));
    assert_eq!(msft.fundamentals_data, json!({"mode": "annual"}));

    let aapl = &stored[0].record;
    assert_eq!(aapl.quotes_data, json!({"lastPrice": 100.0}));
}

#[test_log::test(tokio::test)]
async fn test_rerun_appends_new_documents() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir, "tickers.csv", "SYMBOL\nAAPL\n");
    let config = test_config(&server.uri(), dir.path());

    run(&config).await.unwrap();
    run(&config).await.unwrap();

    let stored = SqliteStore::new(&config.store).read_records().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id, stored[1].id);
}

#[test_log::test(tokio::test)]
async fn test_store_failures_do_not_stop_the_run() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir, "tickers.csv", "SYMBOL\nAAPL\nMSFT\nGOOG\n");
    let mut config = test_config(&server.uri(), dir.path());
    config.store.uri = format!(
        "sqlite:{}",
        dir.path().join("no_such_dir").join("enriched.db").display()
    );

    let outcome = run(&config).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed(RunSummary { total: 3, persisted: 0, failed: 3 })
    );
    assert_eq!(request_count(&server).await, 9);
}

#[test_log::test(tokio::test)]
async fn test_unsupported_store_uri_is_fatal() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir, "tickers.csv", "SYMBOL\nAAPL\n");
    let mut config = test_config(&server.uri(), dir.path());
    config.store.uri = "redis://localhost:6379".to_string();

    let err = run(&config).await.unwrap_err();

    assert!(err.to_string().contains("redis://localhost:6379"));
    assert_eq!(request_count(&server).await, 0);
}
