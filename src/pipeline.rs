use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{EnrichmentClient, EnrichmentSource};
use crate::loader::read_tickers;
use crate::models::Config;
use crate::storage::{store_for, DocumentStore};

/// Counts for a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub persisted: usize,
    pub failed: usize,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing to do: the input could not be read or held no tickers
    NoTickers,
    Completed(RunSummary),
}

/// Sequential enrich-then-persist pipeline
pub struct EnrichmentPipeline {
    source: Arc<dyn EnrichmentSource>,
    store: Arc<dyn DocumentStore>,
}

impl EnrichmentPipeline {
    pub fn new(source: Arc<dyn EnrichmentSource>, store: Arc<dyn DocumentStore>) -> Self {
        Self { source, store }
    }

    /// Enrich one ticker and persist the result. Returns whether the insert succeeded.
    pub async fn process_ticker(&self, ticker: &str) -> bool {
        info!("Processing ticker: {}", ticker);
        let record = self.source.enrich(ticker).await;

        match self.store.insert_record(&record).await {
            Ok(()) => {
                info!("Data for {} saved to {}.", ticker, self.store.name());
                true
            }
            Err(e) => {
                error!("Error saving data for {} to {}: {}", ticker, self.store.name(), e);
                false
            }
        }
    }

    /// Process every ticker in order; one ticker's failure never stops the next
    pub async fn process_all(&self, tickers: &[String]) -> RunSummary {
        let mut summary = RunSummary {
            total: tickers.len(),
            ..RunSummary::default()
        };

        for ticker in tickers {
            if self.process_ticker(ticker).await {
                summary.persisted += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }
}

/// Load tickers, then enrich and persist each of them
pub async fn run(config: &Config) -> Result<RunOutcome> {
    let tickers = match read_tickers(&config.input.csv_path, &config.input.column) {
        Ok(tickers) => tickers,
        Err(e) => {
            error!("{}", e);
            Vec::new()
        }
    };

    if tickers.is_empty() {
        info!("No tickers found or CSV file could not be read. Exiting.");
        return Ok(RunOutcome::NoTickers);
    }

    info!("Loaded {} tickers from {}", tickers.len(), config.input.csv_path.display());

    let client = EnrichmentClient::new(config)?;
    let store = store_for(&config.store)?;
    let pipeline = EnrichmentPipeline::new(Arc::new(client), store);

    let summary = pipeline.process_all(&tickers).await;
    info!(
        "Run finished: {} tickers processed, {} saved, {} failed.",
        summary.total, summary.persisted, summary.failed
    );

    Ok(RunOutcome::Completed(summary))
}
