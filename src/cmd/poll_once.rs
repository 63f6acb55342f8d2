//! `poll-once`: fetches one snapshot and prints it, without touching any
//! state. Useful to check the checkpoint URL and the response format.

use clap::Parser;
use serde::Serialize;
use thiserror::Error;

use crate::{
    config::AppConfig,
    models::{QueueEntry, Snapshot},
    providers::{CheckpointApiFetcher, FetchError, SnapshotFetcher},
};

/// Errors of the `poll-once` command.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    /// The snapshot could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// The output could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments of the `poll-once` command.
#[derive(Parser, Debug)]
pub struct PollOnceArgs {
    /// Fetch this URL instead of the configured `checkpoint_url`.
    #[arg(short, long)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct PollReport {
    queue_size: usize,
    entries: Vec<QueueEntry>,
}

/// Runs the command.
pub async fn execute(args: PollOnceArgs, config_dir: Option<&str>) -> Result<(), Error> {
    let config = AppConfig::new(config_dir)?;
    let url = args.url.unwrap_or_else(|| config.checkpoint_url.clone());

    tracing::info!(url = %url, "Fetching one snapshot...");
    let fetcher = CheckpointApiFetcher::new(&url, config.fetch_timeout_secs)?;
    let mut entries = fetcher.fetch().await?;
    entries.sort_by_key(|entry| entry.position);

    let report = PollReport { queue_size: Snapshot::from_entries(entries.clone()).len(), entries };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
