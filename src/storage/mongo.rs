use async_trait::async_trait;
use mongodb::bson::{self, Document};
use mongodb::Client;
use tracing::debug;

use crate::models::{EnrichedRecord, StoreConfig};
use super::{DocumentStore, StorageError};

/// MongoDB collection sink
pub struct MongoStore {
    uri: String,
    database: String,
    collection: String,
}

impl MongoStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            uri: config.uri.trim().to_string(),
            database: config.database.clone(),
            collection: config.collection.clone(),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn name(&self) -> &'static str {
        "MongoDB"
    }

    async fn insert_record(&self, record: &EnrichedRecord) -> Result<(), StorageError> {
        let document = bson::to_document(record)?;

        let client = Client::with_uri_str(&self.uri).await?;
        let result = client
            .database(&self.database)
            .collection::<Document>(&self.collection)
            .insert_one(document, None)
            .await;
        client.shutdown().await;

        let inserted = result?;
        debug!("Inserted {} into {}.{} as {}", record.ticker, self.database, self.collection, inserted.inserted_id);
        Ok(())
    }
}
