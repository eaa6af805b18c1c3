//! Persistence of enriched records.
//!
//! Every insert opens its own connection and closes it again before
//! returning, whether the insert succeeded or not. Nothing is pooled or
//! reused across tickers, and no idempotency key is used: inserting the same
//! ticker twice stores two documents.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EnrichedRecord, StoreConfig};

pub mod mongo;
pub mod sqlite;

pub use mongo::MongoStore;
pub use sqlite::{SqliteStore, StoredRecord};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsupported store URI '{0}': expected mongodb://, mongodb+srv:// or sqlite:")]
    UnsupportedUri(String),

    #[error("Store database and collection names must not be empty")]
    EmptyNamespace,

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to convert record to BSON: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Failed to encode record as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A document store that accepts one enriched record per insert
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Human readable name used in log lines
    fn name(&self) -> &'static str;

    async fn insert_record(&self, record: &EnrichedRecord) -> Result<(), StorageError>;
}

/// Pick a store implementation from the connection URI scheme
pub fn store_for(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StorageError> {
    if config.database.trim().is_empty() || config.collection.trim().is_empty() {
        return Err(StorageError::EmptyNamespace);
    }

    let uri = config.uri.trim();
    if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
        Ok(Arc::new(MongoStore::new(config)))
    } else if uri.starts_with("sqlite:") {
        Ok(Arc::new(SqliteStore::new(config)))
    } else {
        Err(StorageError::UnsupportedUri(config.uri.clone()))
    }
}
