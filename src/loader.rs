//! Reads ticker symbols from a CSV file.
//!
//! Column names are matched after normalization: every `#` is removed,
//! surrounding whitespace trimmed and the result uppercased, so a header of
//! `# Symbol ` answers a request for `symbol`.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;

use crate::models::TickerList;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file not found at {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Column '{requested}' not found. Available columns: {available:?}")]
    ColumnNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Error reading CSV file: {0}")]
    LoadFailure(#[from] csv::Error),
}

/// Cell values read as missing rather than as a symbol
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_MARKERS.contains(&value)
}

/// Normalize a column name for comparison
pub fn normalize_column_name(name: &str) -> String {
    name.replace('#', "").trim().to_uppercase()
}

/// Read the tickers in `column` from the CSV file at `path`
pub fn read_tickers(path: impl AsRef<Path>, column: &str) -> Result<TickerList, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::SourceNotFound(path.to_path_buf()),
        _ => LoadError::LoadFailure(e.into()),
    })?;

    let tickers = read_tickers_from_reader(file, column)?;
    debug!("Read {} tickers from {}", tickers.len(), path.display());
    Ok(tickers)
}

/// Read the tickers in `column` from any CSV source
pub fn read_tickers_from_reader<R: Read>(reader: R, column: &str) -> Result<TickerList, LoadError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let requested = normalize_column_name(column);
    let available: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_column_name)
        .collect();

    let index = available
        .iter()
        .position(|name| *name == requested)
        .ok_or_else(|| LoadError::ColumnNotFound {
            requested: requested.clone(),
            available: available.clone(),
        })?;

    let mut tickers = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Short rows, blank cells and missing markers carry no symbol
        if let Some(value) = record.get(index).map(str::trim).filter(|v| !is_missing(v)) {
            tickers.push(value.to_string());
        }
    }

    Ok(tickers)
}
