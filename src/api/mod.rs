use async_trait::async_trait;

use crate::models::EnrichedRecord;

pub mod enrichment_client;
pub use enrichment_client::EnrichmentClient;

pub const ACCEPT_HEADER: &str = "application/json, text/plain, */*";
pub const CONTENT_TYPE_HEADER: &str = "application/json";

/// Fundamentals are always requested in annual mode
pub const FUNDAMENTALS_MODE: &str = "annual";

/// Anything that can turn a ticker into an enriched record.
///
/// Implementations never fail: an upstream call that does not succeed
/// leaves its slot in the record as an empty object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    async fn enrich(&self, ticker: &str) -> EnrichedRecord;
}
