use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod config;
pub use config::{Config, EndpointConfig, InputConfig, StoreConfig};

/// Ticker symbols in input-file order
pub type TickerList = Vec<String>;

/// The three upstream APIs queried for every ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Quotes,
    Profile,
    Fundamentals,
}

impl ApiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKind::Quotes => "quotes",
            ApiKind::Profile => "profile",
            ApiKind::Fundamentals => "fundamentals",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merged API data for one ticker, stored as a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub ticker: String,
    pub quotes_data: Value,
    pub profile_data: Value,
    pub fundamentals_data: Value,
}

impl EnrichedRecord {
    /// A record whose three data slots are all empty objects
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            quotes_data: empty_object(),
            profile_data: empty_object(),
            fundamentals_data: empty_object(),
        }
    }

    pub fn slot_mut(&mut self, api: ApiKind) -> &mut Value {
        match api {
            ApiKind::Quotes => &mut self.quotes_data,
            ApiKind::Profile => &mut self.profile_data,
            ApiKind::Fundamentals => &mut self.fundamentals_data,
        }
    }

    pub fn slot(&self, api: ApiKind) -> &Value {
        match api {
            ApiKind::Quotes => &self.quotes_data,
            ApiKind::Profile => &self.profile_data,
            ApiKind::Fundamentals => &self.fundamentals_data,
        }
    }
}

/// `{}`, stored for any call that did not succeed
pub fn empty_object() -> Value {
    Value::Object(Map::new())
}
