use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection, Row};
use tracing::{debug, warn};

use crate::models::{EnrichedRecord, StoreConfig};
use super::{DocumentStore, StorageError};

/// A record read back from a SQLite store
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: i64,
    pub inserted_at: DateTime<Utc>,
    pub record: EnrichedRecord,
}

/// SQLite-backed document table.
///
/// The table is named after the `<database>.<collection>` namespace and
/// keeps each data slot as JSON text.
pub struct SqliteStore {
    uri: String,
    table: String,
}

impl SqliteStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            uri: config.uri.trim().to_string(),
            table: quote_identifier(&format!("{}.{}", config.database, config.collection)),
        }
    }

    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        let conn = SqliteConnectOptions::from_str(&self.uri)?
            .create_if_missing(true)
            .connect()
            .await?;
        Ok(conn)
    }

    async fn ensure_table(&self, conn: &mut SqliteConnection) -> Result<(), StorageError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                quotes_data TEXT NOT NULL,
                profile_data TEXT NOT NULL,
                fundamentals_data TEXT NOT NULL,
                inserted_at DATETIME NOT NULL
            )
            "#,
            self.table
        );
        sqlx::query(&ddl).execute(&mut *conn).await?;
        Ok(())
    }

    async fn insert_with(&self, conn: &mut SqliteConnection, record: &EnrichedRecord) -> Result<i64, StorageError> {
        self.ensure_table(conn).await?;

        let sql = format!(
            "INSERT INTO {} (ticker, quotes_data, profile_data, fundamentals_data, inserted_at) VALUES (?, ?, ?, ?, ?)",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(&record.ticker)
            .bind(serde_json::to_string(&record.quotes_data)?)
            .bind(serde_json::to_string(&record.profile_data)?)
            .bind(serde_json::to_string(&record.fundamentals_data)?)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn read_with(&self, conn: &mut SqliteConnection) -> Result<Vec<StoredRecord>, StorageError> {
        self.ensure_table(conn).await?;

        let sql = format!(
            "SELECT id, ticker, quotes_data, profile_data, fundamentals_data, inserted_at FROM {} ORDER BY id",
            self.table
        );
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let quotes: String = row.try_get("quotes_data")?;
            let profile: String = row.try_get("profile_data")?;
            let fundamentals: String = row.try_get("fundamentals_data")?;

            records.push(StoredRecord {
                id: row.try_get("id")?,
                inserted_at: row.try_get("inserted_at")?,
                record: EnrichedRecord {
                    ticker: row.try_get("ticker")?,
                    quotes_data: serde_json::from_str(&quotes)?,
                    profile_data: serde_json::from_str(&profile)?,
                    fundamentals_data: serde_json::from_str(&fundamentals)?,
                },
            });
        }
        Ok(records)
    }

    /// Every stored record, oldest first
    pub async fn read_records(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let mut conn = self.connect().await?;
        let result = self.read_with(&mut conn).await;
        finish(result, conn.close().await)
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    async fn insert_record(&self, record: &EnrichedRecord) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let result = self.insert_with(&mut conn, record).await;

        let id = finish(result, conn.close().await)?;
        debug!("Inserted {} into {} as row {}", record.ticker, self.table, id);
        Ok(())
    }
}

/// Combine an operation's result with the outcome of closing its connection.
/// The operation's own error wins; a close failure after it is only logged.
fn finish<T>(result: Result<T, StorageError>, closed: Result<(), sqlx::Error>) -> Result<T, StorageError> {
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Failed to close SQLite connection: {}", close_err);
            Err(e)
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
