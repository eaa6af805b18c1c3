//! Common test utilities and helpers

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use ticker_enricher::models::{Config, EndpointConfig, InputConfig, StoreConfig};
use url::Url;

pub const QUOTES_TOKEN: &str = "quotes-token";
pub const PROFILE_TOKEN: &str = "profile-token";
pub const FUNDAMENTALS_TOKEN: &str = "fundamentals-token";

/// Build a config pointing every API at `base_url` and the store at a SQLite file in `dir`
pub fn test_config(base_url: &str, dir: &Path) -> Config {
    let endpoint = |path: &str, token: &str| EndpointConfig {
        url: Url::parse(&format!("{}{}", base_url, path)).unwrap(),
        token: token.to_string(),
    };

    Config {
        quotes: endpoint("/quotes", QUOTES_TOKEN),
        profile: endpoint("/profile", PROFILE_TOKEN),
        fundamentals: endpoint("/fundamentals", FUNDAMENTALS_TOKEN),
        store: sqlite_store_config(dir),
        input: InputConfig {
            csv_path: dir.join("tickers.csv"),
            column: "SYMBOL".to_string(),
        },
        request_timeout: Duration::from_secs(2),
    }
}

pub fn sqlite_store_config(dir: &Path) -> StoreConfig {
    StoreConfig {
        uri: format!("sqlite:{}", dir.join("enriched.db").display()),
        database: "market_data".to_string(),
        collection: "ticker_enrichment".to_string(),
    }
}

/// Write `contents` to `name` inside `dir`
pub fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test harness may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("ticker_enricher=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }
}
