use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ticker_enricher::models::Config;
use ticker_enricher::pipeline::{self, RunOutcome};

#[derive(Parser, Debug)]
#[command(author, version, about = "Enrich ticker symbols from a CSV file and store the results", long_about = None)]
struct Args {
    /// CSV file holding the ticker symbols (overrides TICKER_CSV_PATH)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Column holding the ticker symbols (overrides TICKER_COLUMN)
    #[arg(short, long)]
    column: Option<String>,

    /// Per-request timeout in seconds (overrides REQUEST_TIMEOUT_SECS)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Configuration Error: {:#}", e);
            eprintln!("Make sure you have a .env file with the API endpoints, tokens and STORE_URI.");
            std::process::exit(1);
        }
    };

    if let Some(file) = args.file {
        config.input.csv_path = file;
    }
    if let Some(column) = args.column {
        config.input.column = column;
    }
    if let Some(secs) = args.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }

    match pipeline::run(&config).await? {
        RunOutcome::NoTickers => {}
        RunOutcome::Completed(summary) if summary.failed > 0 => {
            println!("⚠️  {} of {} tickers could not be saved", summary.failed, summary.total);
        }
        RunOutcome::Completed(_) => println!("✅ Script finished successfully."),
    }

    Ok(())
}
