pub mod api;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod storage;

pub use models::{Config, EnrichedRecord};
pub use pipeline::{run, RunOutcome, RunSummary};
