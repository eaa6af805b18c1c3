use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// One upstream API: where to call it and which bearer token to send
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub url: Url,
    pub token: String,
}

/// Document store location
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// Where tickers come from
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub csv_path: PathBuf,
    pub column: String,
}

/// Configuration for a run
#[derive(Debug, Clone)]
pub struct Config {
    pub quotes: EndpointConfig,
    pub profile: EndpointConfig,
    pub fundamentals: EndpointConfig,
    pub store: StoreConfig,
    pub input: InputConfig,
    pub request_timeout: Duration,
}

pub const DEFAULT_TICKER_COLUMN: &str = "SYMBOL";
pub const DEFAULT_CSV_PATH: &str = "contract_master.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("{} environment variable required", key))
        };
        let endpoint = |url_key: &str, token_key: &str| -> Result<EndpointConfig> {
            let raw = required(url_key)?;
            let url = Url::parse(&raw).with_context(|| format!("{} is not a valid URL: {}", url_key, raw))?;
            Ok(EndpointConfig {
                url,
                token: required(token_key)?,
            })
        };

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be at least 1 second, got '0'"));
        }

        Ok(Config {
            quotes: endpoint("API_QUOTES_URL", "AUTH_TOKEN_API_1")?,
            profile: endpoint("API_QUOTE_PROFILE_URL", "AUTH_TOKEN_API_2")?,
            fundamentals: endpoint("API_FUNDAMENTALS_URL", "AUTH_TOKEN_API_3")?,
            store: StoreConfig {
                uri: required("STORE_URI")?,
                database: lookup("STORE_DATABASE").unwrap_or_else(|| "market_data".to_string()),
                collection: lookup("STORE_COLLECTION").unwrap_or_else(|| "ticker_enrichment".to_string()),
            },
            input: InputConfig {
                csv_path: lookup("TICKER_CSV_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
                column: lookup("TICKER_COLUMN").unwrap_or_else(|| DEFAULT_TICKER_COLUMN.to_string()),
            },
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
