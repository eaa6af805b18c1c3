use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE}, Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::{empty_object, ApiKind, Config, EndpointConfig, EnrichedRecord};
use super::{EnrichmentSource, ACCEPT_HEADER, CONTENT_TYPE_HEADER, FUNDAMENTALS_MODE};

/// Body of the fundamentals POST
#[derive(Debug, Serialize)]
struct FundamentalsRequest<'a> {
    symbol: &'a str,
    mode: &'static str,
}

/// HTTP client for the quotes, profile and fundamentals APIs
pub struct EnrichmentClient {
    client: Client,
    quotes: EndpointConfig,
    profile: EndpointConfig,
    fundamentals: EndpointConfig,
}

impl EnrichmentClient {
    /// Create a new enrichment client
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HEADER));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent("ticker-enricher/0.1")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            quotes: config.quotes.clone(),
            profile: config.profile.clone(),
            fundamentals: config.fundamentals.clone(),
        })
    }

    fn request_for(&self, api: ApiKind, ticker: &str) -> RequestBuilder {
        match api {
            ApiKind::Quotes => self.client
                .get(self.quotes.url.clone())
                .query(&[("symbols", ticker)])
                .bearer_auth(&self.quotes.token),
            ApiKind::Profile => self.client
                .get(self.profile.url.clone())
                .query(&[("symbol", ticker)])
                .bearer_auth(&self.profile.token),
            ApiKind::Fundamentals => self.client
                .post(self.fundamentals.url.clone())
                .json(&FundamentalsRequest { symbol: ticker, mode: FUNDAMENTALS_MODE })
                .bearer_auth(&self.fundamentals.token),
        }
    }

    /// Perform one call, falling back to `{}` on any failure
    async fn fetch(&self, api: ApiKind, ticker: &str) -> Value {
        let response = match self.request_for(api, ticker).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() { "timed out" } else { "failed" };
                warn!("{} request for {} {}: {}", api, ticker, reason, e);
                return empty_object();
            }
        };

        let status = response.status();
        info!("{} response for {}: {}", api, ticker, status.as_u16());

        if !status.is_success() {
            return empty_object();
        }

        match response.json::<Value>().await {
            Ok(body) => {
                debug!("{} body for {} parsed", api, ticker);
                body
            }
            Err(e) => {
                warn!("{} response for {} could not be parsed: {}", api, ticker, e);
                empty_object()
            }
        }
    }
}

#[async_trait]
impl EnrichmentSource for EnrichmentClient {
    async fn enrich(&self, ticker: &str) -> EnrichedRecord {
        let mut record = EnrichedRecord::empty(ticker);

        for api in [ApiKind::Quotes, ApiKind::Profile, ApiKind::Fundamentals] {
            *record.slot_mut(api) = self.fetch(api, ticker).await;
        }

        record
    }
}
